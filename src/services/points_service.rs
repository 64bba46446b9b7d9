use serde::Serialize;

use crate::models::points_tier;

/// Moteur de calcul des points. Fonctions pures, sans I/O ni état partagé :
/// appelable sans risque depuis n'importe quel nombre de requêtes concurrentes.
pub struct PointsService;

/// Trou de couverture entre deux tranches actives adjacentes : aucun point
/// n'est attribué pour un montant dans [from, to). Légal, affiché à l'admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageGap {
    pub from: i64,
    pub to: i64,
}

impl PointsService {
    /// Calcule les points attribués pour un montant donné (en centimes).
    /// Sans tranche active configurée, ou si le montant tombe dans un trou
    /// de couverture, retourne 0 : c'est un résultat normal, pas une erreur.
    pub fn calculate_points(amount_cents: i64, tiers: &[points_tier::Model]) -> i32 {
        match Self::find_matching_tier(amount_cents, tiers) {
            Some(tier) => tier.points_awarded,
            None => 0,
        }
    }

    /// Retourne la tranche active qui contient le montant. Les tranches sont
    /// parcourues par borne basse décroissante : si l'invariant de
    /// non-chevauchement a été violé, la tranche au seuil le plus haut gagne,
    /// de façon déterministe. Sinon la tranche trouvée est unique.
    pub fn find_matching_tier<'a>(
        amount_cents: i64,
        tiers: &'a [points_tier::Model],
    ) -> Option<&'a points_tier::Model> {
        let mut active = Self::active_sorted(tiers);
        active.reverse();

        active
            .into_iter()
            .find(|tier| tier.matches_amount(amount_cents))
    }

    /// Vérifie que les tranches actives sont deux à deux disjointes et bien
    /// ordonnées. Une tranche sans plafond qui n'est pas la dernière bloque
    /// tout ce qui viendrait après : c'est un échec.
    pub fn validate_tiers_no_overlap(tiers: &[points_tier::Model]) -> bool {
        let active = Self::active_sorted(tiers);

        for pair in active.windows(2) {
            let (current, next) = (pair[0], pair[1]);

            match current.max_amount_cents {
                None => return false, // une tranche sans plafond doit être la dernière
                Some(max) if max > next.min_amount_cents => return false, // chevauchement
                _ => {}
            }
        }

        true
    }

    /// Liste les trous de couverture entre tranches actives adjacentes.
    /// Utilisé uniquement pour la visibilité admin.
    pub fn find_gaps_in_coverage(tiers: &[points_tier::Model]) -> Vec<CoverageGap> {
        let active = Self::active_sorted(tiers);
        let mut gaps = Vec::new();

        for pair in active.windows(2) {
            let (current, next) = (pair[0], pair[1]);

            if let Some(max) = current.max_amount_cents {
                if max < next.min_amount_cents {
                    gaps.push(CoverageGap {
                        from: max,
                        to: next.min_amount_cents,
                    });
                }
            }
        }

        gaps
    }

    /// Tranches actives triées par borne basse croissante
    fn active_sorted(tiers: &[points_tier::Model]) -> Vec<&points_tier::Model> {
        let mut active: Vec<&points_tier::Model> =
            tiers.iter().filter(|tier| tier.is_active).collect();
        active.sort_by_key(|tier| tier.min_amount_cents);
        active
    }
}
