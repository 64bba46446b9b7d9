use actix_web::{get, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, ColumnTrait};

use crate::middleware::AuthUser;
use crate::models::dto::WalletResponse;
use crate::models::points_wallet::{Column as WalletColumn, Entity as PointsWallet};

/// GET /api/wallet - Solde de points de l'utilisateur connecté.
/// Le portefeuille n'existe qu'après un premier crédit : sans ligne, le
/// solde est simplement 0.
#[get("")]
pub async fn get_wallet(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let wallet = PointsWallet::find()
        .filter(WalletColumn::UserId.eq(auth_user.user_id))
        .one(db.get_ref())
        .await;

    match wallet {
        Ok(wallet) => {
            let total_points = wallet.map(|w| w.total_points).unwrap_or(0);
            HttpResponse::Ok().json(WalletResponse {
                user_id: auth_user.user_id,
                total_points,
            })
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to fetch wallet: {}", e)
        })),
    }
}

pub fn wallet_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/wallet")
            .service(get_wallet)
    );
}
