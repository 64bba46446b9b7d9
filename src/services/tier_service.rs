use sea_orm::*;
use chrono::Utc;
use uuid::Uuid;

use crate::models::dto::{CreateTierRequest, UpdateTierRequest};
use crate::models::points_tier::{self, Column as TierColumn, Entity as PointsTier};
use crate::services::error::ServiceError;
use crate::services::points_service::{CoverageGap, PointsService};

pub struct TierService;

impl TierService {
    /// Liste toutes les tranches (actives ou non) triées par borne basse,
    /// avec les trous de couverture de l'ensemble actif pour l'admin
    pub async fn list_tiers(
        db: &DatabaseConnection,
    ) -> Result<(Vec<points_tier::Model>, Vec<CoverageGap>), ServiceError> {
        let tiers = PointsTier::find()
            .order_by_asc(TierColumn::MinAmountCents)
            .all(db)
            .await?;

        let gaps = PointsService::find_gaps_in_coverage(&tiers);

        Ok((tiers, gaps))
    }

    /// Crée une tranche après validation des bornes et du non-chevauchement
    /// avec l'ensemble actif. La séquence lire-valider-écrire s'exécute dans
    /// une transaction sérialisable pour fermer la course entre deux
    /// créations concurrentes qui passeraient chacune le contrôle sur un
    /// instantané périmé.
    pub async fn create_tier(
        db: &DatabaseConnection,
        input: CreateTierRequest,
    ) -> Result<points_tier::Model, ServiceError> {
        Self::check_bounds(input.min_amount_cents, input.max_amount_cents, input.points_awarded)?;

        let tier = db
            .transaction_with_config::<_, points_tier::Model, ServiceError>(
                |txn| {
                    Box::pin(async move {
                        let active = PointsTier::find()
                            .filter(TierColumn::IsActive.eq(true))
                            .all(txn)
                            .await?;

                        Self::check_no_overlap(
                            input.min_amount_cents,
                            input.max_amount_cents,
                            &active,
                        )?;

                        let now = Utc::now();
                        let new_tier = points_tier::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            min_amount_cents: Set(input.min_amount_cents),
                            max_amount_cents: Set(input.max_amount_cents),
                            points_awarded: Set(input.points_awarded),
                            label: Set(input.label),
                            is_active: Set(true),
                            created_at: Set(now),
                            updated_at: Set(now),
                        };

                        Ok(new_tier.insert(txn).await?)
                    })
                },
                Some(IsolationLevel::Serializable),
                None,
            )
            .await?;

        Ok(tier)
    }

    /// Met à jour une tranche. Les champs absents conservent leur valeur,
    /// un null explicite sur max_amount_cents signifie "sans plafond".
    /// Bornes et chevauchement sont revalidés sur les valeurs fusionnées,
    /// contre toutes les autres tranches actives (la tranche elle-même
    /// est exclue du contrôle).
    pub async fn update_tier(
        db: &DatabaseConnection,
        id: Uuid,
        input: UpdateTierRequest,
    ) -> Result<points_tier::Model, ServiceError> {
        let tier = db
            .transaction_with_config::<_, points_tier::Model, ServiceError>(
                |txn| {
                    Box::pin(async move {
                        let existing = PointsTier::find_by_id(id)
                            .one(txn)
                            .await?
                            .ok_or_else(|| ServiceError::not_found("PointsTier", id))?;

                        // Fusion des champs partiels sur les valeurs courantes
                        let new_min = input.min_amount_cents.unwrap_or(existing.min_amount_cents);
                        let new_max = match input.max_amount_cents {
                            Some(value) => value, // présent: valeur ou null explicite
                            None => existing.max_amount_cents,
                        };
                        let new_points = input.points_awarded.unwrap_or(existing.points_awarded);
                        let new_active = input.is_active.unwrap_or(existing.is_active);

                        Self::check_bounds(new_min, new_max, new_points)?;

                        // Une tranche désactivée sort du contrôle de chevauchement
                        if new_active {
                            let others = PointsTier::find()
                                .filter(TierColumn::IsActive.eq(true))
                                .filter(TierColumn::Id.ne(id))
                                .all(txn)
                                .await?;

                            Self::check_no_overlap(new_min, new_max, &others)?;
                        }

                        let mut active_model: points_tier::ActiveModel = existing.into();
                        active_model.min_amount_cents = Set(new_min);
                        active_model.max_amount_cents = Set(new_max);
                        active_model.points_awarded = Set(new_points);
                        active_model.is_active = Set(new_active);
                        if let Some(label) = input.label {
                            active_model.label = Set(label);
                        }
                        active_model.updated_at = Set(Utc::now());

                        Ok(active_model.update(txn).await?)
                    })
                },
                Some(IsolationLevel::Serializable),
                None,
            )
            .await?;

        Ok(tier)
    }

    /// Supprime définitivement une tranche. Aucun contrôle de dépendance :
    /// les points des transactions validées sont déjà figés dans celles-ci.
    pub async fn delete_tier(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
        let existing = PointsTier::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("PointsTier", id))?;

        PointsTier::delete_by_id(existing.id).exec(db).await?;

        Ok(())
    }

    /// Bornes d'une tranche : min >= 0, max > min quand il existe, points >= 0
    fn check_bounds(min: i64, max: Option<i64>, points: i32) -> Result<(), ServiceError> {
        if min < 0 {
            return Err(ServiceError::validation(
                "Le montant minimum ne peut pas être négatif",
            ));
        }

        if let Some(max) = max {
            if max <= min {
                return Err(ServiceError::validation(
                    "Le montant maximum doit être supérieur au montant minimum",
                ));
            }
        }

        if points < 0 {
            return Err(ServiceError::validation(
                "Le nombre de points ne peut pas être négatif",
            ));
        }

        Ok(())
    }

    /// Rejette la tranche candidate si elle chevauche une tranche existante.
    /// L'erreur nomme la tranche en conflit sous forme lisible.
    fn check_no_overlap(
        min: i64,
        max: Option<i64>,
        existing: &[points_tier::Model],
    ) -> Result<(), ServiceError> {
        for other in existing {
            if Self::ranges_overlap(min, max, other.min_amount_cents, other.max_amount_cents) {
                return Err(ServiceError::validation(format!(
                    "Cette tranche chevauche une tranche existante ({})",
                    other.format_range()
                )));
            }
        }

        Ok(())
    }

    /// Deux intervalles [min, max) se chevauchent quand chacun commence
    /// avant la fin effective de l'autre (max absent = +infini)
    fn ranges_overlap(min_a: i64, max_a: Option<i64>, min_b: i64, max_b: Option<i64>) -> bool {
        let a_max = max_a.unwrap_or(i64::MAX);
        let b_max = max_b.unwrap_or(i64::MAX);

        min_a < b_max && a_max > min_b
    }
}
