use actix_web::{post, get, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, ColumnTrait, QueryOrder};
use uuid::Uuid;
use validator::Validate;

use crate::middleware::AuthUser;
use crate::models::dto::{CreateTransactionRequest, TransactionResponse, ValidateTransactionRequest};
use crate::models::transaction::{self, TransactionStatus};
use crate::models::users::UserRole;
use crate::services::transaction_service::TransactionService;

fn to_response(t: transaction::Model) -> TransactionResponse {
    TransactionResponse {
        id: t.id,
        je_user_id: t.je_user_id,
        solidarity_company_id: t.solidarity_company_id,
        amount_cents: t.amount_cents,
        description: t.description,
        status: t.status,
        points_earned: t.points_earned,
        validated_at: t.validated_at,
        created_at: t.created_at,
    }
}

/// POST /api/transactions - Enregistrer un achat auprès d'une ES (JE)
#[post("")]
pub async fn create_transaction(
    auth_user: AuthUser,
    body: web::Json<CreateTransactionRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    match TransactionService::create_transaction(db.get_ref(), auth_user.user_id, body.into_inner())
        .await
    {
        Ok(created) => HttpResponse::Created().json(to_response(created)),
        Err(e) => e.to_response(),
    }
}

/// GET /api/transactions - Ses transactions (JE) ou la file en attente (ES/admin)
#[get("")]
pub async fn list_transactions(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let mut query = transaction::Entity::find();

    query = match auth_user.role {
        UserRole::Je => query.filter(transaction::Column::JeUserId.eq(auth_user.user_id)),
        // ES et admin voient la file des transactions à traiter
        UserRole::Es | UserRole::Admin => {
            query.filter(transaction::Column::Status.eq(TransactionStatus::Pending))
        }
    };

    let transactions = query
        .order_by_desc(transaction::Column::CreatedAt)
        .all(db.get_ref())
        .await;

    match transactions {
        Ok(transactions) => {
            let response: Vec<TransactionResponse> =
                transactions.into_iter().map(to_response).collect();
            HttpResponse::Ok().json(response)
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to fetch transactions: {}", e)
        })),
    }
}

/// POST /api/transactions/{id}/validate - Approuver ou rejeter (ES/admin)
#[post("/{id}/validate")]
pub async fn validate_transaction(
    auth_user: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<ValidateTransactionRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let transaction_id = path.into_inner();

    match TransactionService::validate_transaction(
        db.get_ref(),
        auth_user.user_id,
        transaction_id,
        body.approve,
    )
    .await
    {
        Ok(summary) => HttpResponse::Ok().json(serde_json::json!({
            "transaction": summary
        })),
        Err(e) => e.to_response(),
    }
}

pub fn transaction_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/transactions")
            .service(create_transaction)
            .service(list_transactions)
            .service(validate_transaction)
    );
}
