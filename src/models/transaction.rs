use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

/// Statut d'une transaction. Seules deux transitions existent, toutes deux
/// définitives : PENDING -> VALIDATED et PENDING -> REJECTED.
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "VALIDATED")]
    Validated,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transaction")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub je_user_id: Uuid,
    pub solidarity_company_id: Uuid,
    pub amount_cents: i64, // Toujours > 0
    pub description: Option<String>,
    pub status: TransactionStatus,
    pub points_earned: i32, // Écrit une seule fois, avec la transition VALIDATED
    pub validated_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::JeUserId",
        to = "super::users::Column::Id"
    )]
    JeUser,

    #[sea_orm(
        belongs_to = "super::solidarity_company::Entity",
        from = "Column::SolidarityCompanyId",
        to = "super::solidarity_company::Column::Id"
    )]
    SolidarityCompany,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JeUser.def()
    }
}

impl Related<super::solidarity_company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SolidarityCompany.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_pending(&self) -> bool {
        self.status == TransactionStatus::Pending
    }

    pub fn is_validated(&self) -> bool {
        self.status == TransactionStatus::Validated
    }

    pub fn is_rejected(&self) -> bool {
        self.status == TransactionStatus::Rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_status_helpers_and_json_shape() {
        let now = Utc::now();
        let mut model = Model {
            id: Uuid::new_v4(),
            je_user_id: Uuid::new_v4(),
            solidarity_company_id: Uuid::new_v4(),
            amount_cents: 1500,
            description: None,
            status: TransactionStatus::Pending,
            points_earned: 0,
            validated_at: None,
            created_at: now,
            updated_at: now,
        };

        assert!(model.is_pending());
        assert!(!model.is_validated());

        model.status = TransactionStatus::Validated;
        assert!(model.is_validated());
        model.status = TransactionStatus::Rejected;
        assert!(model.is_rejected());

        // Le statut est sérialisé en MAJUSCULES dans les réponses API
        let json = serde_json::to_value(TransactionStatus::Validated).unwrap();
        assert_eq!(json, serde_json::json!("VALIDATED"));
    }
}
