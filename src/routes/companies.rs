use actix_web::{get, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, ColumnTrait, QueryOrder};

use crate::models::dto::CompanyResponse;
use crate::models::solidarity_company::{Column as CompanyColumn, Entity as SolidarityCompany};

/// GET /api/companies - Lister les entreprises solidaires vérifiées (PUBLIC)
#[get("")]
pub async fn list_companies(db: web::Data<DatabaseConnection>) -> HttpResponse {
    let companies = SolidarityCompany::find()
        .filter(CompanyColumn::IsVerified.eq(true))
        .order_by_asc(CompanyColumn::Name)
        .all(db.get_ref())
        .await;

    match companies {
        Ok(companies) => {
            let response: Vec<CompanyResponse> = companies
                .into_iter()
                .map(|c| CompanyResponse {
                    id: c.id,
                    name: c.name,
                    description: c.description,
                })
                .collect();

            HttpResponse::Ok().json(response)
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to fetch companies: {}", e)
        })),
    }
}

pub fn company_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/companies")
            .service(list_companies)
    );
}
