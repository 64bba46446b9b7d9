use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

/// Tranche de points configurée par l'admin.
/// Le montant d'une transaction tombe dans la tranche [min, max) :
/// borne basse incluse, borne haute exclue, max = NULL signifie sans plafond.
/// Invariant global : les tranches actives ne se chevauchent jamais, et au
/// plus une tranche active est sans plafond (forcément la plus haute).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "points_tier")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub min_amount_cents: i64,
    pub max_amount_cents: Option<i64>, // NULL = sans plafond
    pub points_awarded: i32,
    pub label: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Vérifie si un montant (en centimes) tombe dans cette tranche
    pub fn matches_amount(&self, amount_cents: i64) -> bool {
        if amount_cents < self.min_amount_cents {
            return false;
        }
        match self.max_amount_cents {
            Some(max) => amount_cents < max,
            None => true,
        }
    }

    /// Affichage lisible de la tranche, en euros
    pub fn format_range(&self) -> String {
        let min_euros = self.min_amount_cents as f64 / 100.0;
        match self.max_amount_cents {
            Some(max) => {
                let max_euros = max as f64 / 100.0;
                format!("{:.2} € - {:.2} €", min_euros, max_euros)
            }
            None => format!("> {:.2} €", min_euros),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tier(min: i64, max: Option<i64>) -> Model {
        let now = Utc::now();
        Model {
            id: Uuid::new_v4(),
            min_amount_cents: min,
            max_amount_cents: max,
            points_awarded: 1,
            label: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_matches_amount_bounds() {
        let bounded = tier(1000, Some(5000));
        assert!(!bounded.matches_amount(999));
        assert!(bounded.matches_amount(1000)); // borne basse incluse
        assert!(bounded.matches_amount(4999));
        assert!(!bounded.matches_amount(5000)); // borne haute exclue

        let unbounded = tier(5000, None);
        assert!(unbounded.matches_amount(5000));
        assert!(unbounded.matches_amount(i64::MAX));
    }

    #[test]
    fn test_format_range() {
        assert_eq!(tier(0, Some(1000)).format_range(), "0.00 € - 10.00 €");
        assert_eq!(tier(10000, None).format_range(), "> 100.00 €");
    }
}
