use actix_web::HttpResponse;
use sea_orm::{DbErr, TransactionError};

/// Erreurs métier des services. Chaque variante correspond à un statut HTTP :
/// Validation -> 400, NotFound -> 404, Unauthorized -> 403, Conflict -> 409,
/// Db -> 500. Aucune n'est réessayée automatiquement.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Db(#[from] DbErr),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        ServiceError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Convertit l'erreur en réponse HTTP JSON ({"error": "..."})
    pub fn to_response(&self) -> HttpResponse {
        let body = serde_json::json!({ "error": self.to_string() });

        match self {
            ServiceError::Validation(_) => HttpResponse::BadRequest().json(body),
            ServiceError::NotFound { .. } => HttpResponse::NotFound().json(body),
            ServiceError::Unauthorized(_) => HttpResponse::Forbidden().json(body),
            ServiceError::Conflict(_) => HttpResponse::Conflict().json(body),
            ServiceError::Db(_) => HttpResponse::InternalServerError().json(body),
        }
    }
}

// Déballe les erreurs sorties d'un bloc db.transaction(...)
impl From<TransactionError<ServiceError>> for ServiceError {
    fn from(err: TransactionError<ServiceError>) -> Self {
        match err {
            TransactionError::Connection(e) => ServiceError::Db(e),
            TransactionError::Transaction(e) => e,
        }
    }
}
