use actix_web::{dev::Payload, Error, FromRequest, HttpRequest, HttpResponse};
use futures::future::{ready, Ready};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::users::UserRole;
use crate::utils::jwt;

/// Structure qui contient les infos de l'utilisateur authentifié
/// Utilisée comme extracteur dans les routes protégées
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
}

fn unauthorized(message: &str) -> Ready<Result<AuthUser, Error>> {
    let response = HttpResponse::Unauthorized().json(serde_json::json!({
        "error": message
    }));
    ready(Err(actix_web::error::InternalError::from_response("", response).into()))
}

/// Implémentation de FromRequest pour AuthUser
/// Cela permet à Actix-Web d'extraire automatiquement AuthUser des requêtes
impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // 1. Extraire le header Authorization
        let auth_header = match req.headers().get("Authorization") {
            Some(header) => header,
            None => return unauthorized("Missing Authorization header"),
        };

        let auth_str = match auth_header.to_str() {
            Ok(s) => s,
            Err(_) => return unauthorized("Invalid Authorization header"),
        };

        // 2. Extraire le token (format: "Bearer <token>")
        let token = match auth_str.strip_prefix("Bearer ") {
            Some(token) => token,
            None => return unauthorized("Invalid Authorization format (expected: Bearer <token>)"),
        };

        // 3. Vérifier le token JWT et en tirer l'identité + le rôle
        match jwt::verify_token(token) {
            Ok(claims) => ready(Ok(AuthUser {
                user_id: claims.sub,
                email: claims.email,
                role: claims.role,
            })),
            Err(e) => {
                let message = format!("Invalid token: {}", e);
                let response = HttpResponse::Unauthorized().json(serde_json::json!({
                    "error": message
                }));
                ready(Err(
                    actix_web::error::InternalError::from_response("", response).into()
                ))
            }
        }
    }
}
