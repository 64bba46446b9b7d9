use actix_web::{post, get, patch, delete, web, HttpResponse};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::middleware::AuthUser;
use crate::models::dto::{CreateTierRequest, TierResponse, UpdateTierRequest};
use crate::models::points_tier;
use crate::models::users::UserRole;
use crate::services::points_service::PointsService;
use crate::services::tier_service::TierService;

fn to_response(tier: points_tier::Model) -> TierResponse {
    TierResponse {
        id: tier.id,
        min_amount_cents: tier.min_amount_cents,
        max_amount_cents: tier.max_amount_cents,
        points_awarded: tier.points_awarded,
        label: tier.label,
        is_active: tier.is_active,
        created_at: tier.created_at,
        updated_at: tier.updated_at,
    }
}

// La configuration des tranches est réservée aux administrateurs
fn require_admin(auth_user: &AuthUser) -> Option<HttpResponse> {
    if auth_user.role != UserRole::Admin {
        return Some(HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Accès réservé aux administrateurs"
        })));
    }
    None
}

/// GET /api/admin/points-tiers - Lister les tranches et les trous de couverture
#[get("")]
pub async fn list_tiers(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Some(denied) = require_admin(&auth_user) {
        return denied;
    }

    match TierService::list_tiers(db.get_ref()).await {
        Ok((tiers, gaps)) => {
            // Diagnostic admin : l'invariant de non-chevauchement tient-il ?
            let valid = PointsService::validate_tiers_no_overlap(&tiers);
            let tiers: Vec<TierResponse> = tiers.into_iter().map(to_response).collect();
            HttpResponse::Ok().json(serde_json::json!({
                "tiers": tiers,
                "gaps": gaps,
                "valid": valid
            }))
        }
        Err(e) => e.to_response(),
    }
}

/// POST /api/admin/points-tiers - Créer une tranche
#[post("")]
pub async fn create_tier(
    auth_user: AuthUser,
    body: web::Json<CreateTierRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Some(denied) = require_admin(&auth_user) {
        return denied;
    }

    match TierService::create_tier(db.get_ref(), body.into_inner()).await {
        Ok(tier) => HttpResponse::Created().json(to_response(tier)),
        Err(e) => e.to_response(),
    }
}

/// PATCH /api/admin/points-tiers/{id} - Modifier une tranche (champs partiels)
#[patch("/{id}")]
pub async fn update_tier(
    auth_user: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateTierRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Some(denied) = require_admin(&auth_user) {
        return denied;
    }

    match TierService::update_tier(db.get_ref(), path.into_inner(), body.into_inner()).await {
        Ok(tier) => HttpResponse::Ok().json(to_response(tier)),
        Err(e) => e.to_response(),
    }
}

/// DELETE /api/admin/points-tiers/{id} - Supprimer une tranche
#[delete("/{id}")]
pub async fn delete_tier(
    auth_user: AuthUser,
    path: web::Path<Uuid>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Some(denied) = require_admin(&auth_user) {
        return denied;
    }

    match TierService::delete_tier(db.get_ref(), path.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(e) => e.to_response(),
    }
}

pub fn points_tier_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin/points-tiers")
            .service(list_tiers)
            .service(create_tier)
            .service(update_tier)
            .service(delete_tier)
    );
}
