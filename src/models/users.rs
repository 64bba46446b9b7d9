use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

/// Rôle d'un utilisateur sur la plateforme
/// - ADMIN : administre les tranches de points et les comptes
/// - JE : jeune entrepreneur, crée des transactions et cumule des points
/// - ES : représentant d'entreprise solidaire, valide les transactions
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    #[sea_orm(string_value = "JE")]
    Je,
    #[sea_orm(string_value = "ES")]
    Es,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)] // Ne jamais exposer le hash en JSON
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: UserRole,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transaction,

    #[sea_orm(has_one = "super::points_wallet::Entity")]
    PointsWallet,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl Related<super::points_wallet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PointsWallet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_je(&self) -> bool {
        self.role == UserRole::Je
    }

    pub fn is_es(&self) -> bool {
        self.role == UserRole::Es
    }

    /// Nom complet affichable (prénom + nom, ou "Utilisateur" si absent)
    pub fn full_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect();

        if parts.is_empty() {
            "Utilisateur".to_string()
        } else {
            parts.join(" ")
        }
    }
}
