use serde::{Deserialize, Deserializer, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::models::transaction::TransactionStatus;

/// Désérialise un champ en distinguant "absent" de "null explicite" :
/// champ absent -> None, champ null -> Some(None), valeur -> Some(Some(v)).
/// À combiner avec #[serde(default)].
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

// DTO pour créer une transaction (côté JE)
#[derive(Deserialize, Validate)]
pub struct CreateTransactionRequest {
    pub solidarity_company_id: Uuid,
    #[validate(range(min = 1, message = "Transaction amount must be positive"))]
    pub amount_cents: i64,
    pub description: Option<String>,
}

// DTO pour approuver/rejeter une transaction (côté ES ou admin)
#[derive(Deserialize)]
pub struct ValidateTransactionRequest {
    pub approve: bool,
}

// DTO pour une transaction dans la réponse
#[derive(Serialize)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub je_user_id: Uuid,
    pub solidarity_company_id: Uuid,
    pub amount_cents: i64,
    pub description: Option<String>,
    pub status: TransactionStatus,
    pub points_earned: i32,
    pub validated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Tranches de points
// ---------------------------------------------------------------------------

// DTO pour créer une tranche (admin)
#[derive(Deserialize)]
pub struct CreateTierRequest {
    pub min_amount_cents: i64,
    pub max_amount_cents: Option<i64>, // null = sans plafond
    pub points_awarded: i32,
    pub label: Option<String>,
}

// DTO pour modifier une tranche (admin). Tous les champs sont optionnels :
// un champ absent conserve la valeur actuelle. Pour max_amount_cents et
// label, un null explicite est distingué d'un champ absent (double Option).
#[derive(Deserialize, Default)]
pub struct UpdateTierRequest {
    pub min_amount_cents: Option<i64>,
    #[serde(default, deserialize_with = "double_option")]
    pub max_amount_cents: Option<Option<i64>>,
    pub points_awarded: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub label: Option<Option<String>>,
    pub is_active: Option<bool>,
}

// DTO pour une tranche dans la réponse
#[derive(Serialize)]
pub struct TierResponse {
    pub id: Uuid,
    pub min_amount_cents: i64,
    pub max_amount_cents: Option<i64>,
    pub points_awarded: i32,
    pub label: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Portefeuille et entreprises
// ---------------------------------------------------------------------------

// DTO pour le solde de points d'un utilisateur
#[derive(Serialize)]
pub struct WalletResponse {
    pub user_id: Uuid,
    pub total_points: i64,
}

// DTO pour une entreprise solidaire dans la réponse
#[derive(Serialize)]
pub struct CompanyResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_tier_distinguishes_null_from_absent() {
        let body: UpdateTierRequest = serde_json::from_str(r#"{"min_amount_cents": 500}"#).unwrap();
        assert_eq!(body.min_amount_cents, Some(500));
        assert_eq!(body.max_amount_cents, None); // champ absent

        let body: UpdateTierRequest =
            serde_json::from_str(r#"{"max_amount_cents": null}"#).unwrap();
        assert_eq!(body.max_amount_cents, Some(None)); // null explicite = sans plafond

        let body: UpdateTierRequest =
            serde_json::from_str(r#"{"max_amount_cents": 2000}"#).unwrap();
        assert_eq!(body.max_amount_cents, Some(Some(2000)));
    }

    #[test]
    fn test_create_transaction_request_rejects_zero_amount() {
        let request = CreateTransactionRequest {
            solidarity_company_id: Uuid::new_v4(),
            amount_cents: 0,
            description: None,
        };
        assert!(request.validate().is_err());

        let request = CreateTransactionRequest {
            solidarity_company_id: Uuid::new_v4(),
            amount_cents: 1500,
            description: Some("Achat de fournitures".to_string()),
        };
        assert!(request.validate().is_ok());
    }
}
