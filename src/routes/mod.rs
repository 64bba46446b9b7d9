pub mod health;
pub mod auth;
pub mod companies;
pub mod transactions;
pub mod points_tiers;
pub mod wallet;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::health_check)
            .configure(auth::auth_routes)
            .configure(companies::company_routes)
            .configure(transactions::transaction_routes)
            .configure(points_tiers::points_tier_routes)
            .configure(wallet::wallet_routes)
    );
}
