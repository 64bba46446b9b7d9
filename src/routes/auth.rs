use actix_web::{post, get, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, ColumnTrait, Set, ActiveModelTrait};
use serde::{Deserialize, Serialize};
use chrono::Utc;
use uuid::Uuid;

use crate::models::users::{self, Column as UserColumn, Entity as Users, UserRole};
use crate::middleware::AuthUser;
use crate::utils::{jwt, password};

// DTO pour l'inscription
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: UserRole, // "JE" ou "ES" uniquement, les admins sont créés à la main
}

// DTO pour la connexion
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// Réponse après login/register
#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
}

// Réponse pour /auth/me
#[derive(Serialize)]
pub struct MeResponse {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
}

/// POST /auth/register - Créer un compte JE ou ES (PUBLIC)
#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Seuls les rôles JE et ES s'inscrivent librement
    if body.role == UserRole::Admin {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Cannot register with role ADMIN"
        }));
    }

    // 2. Vérifier si l'email est déjà pris
    let existing_user = Users::find()
        .filter(UserColumn::Email.eq(&body.email))
        .one(db.get_ref())
        .await;

    match existing_user {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(serde_json::json!({
                "error": "Email already registered"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
        _ => {}
    }

    // 3. Hash le mot de passe
    let password_hash = match password::hash_password(&body.password) {
        Ok(hash) => hash,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to hash password: {}", e)
            }));
        }
    };

    // 4. Créer l'utilisateur
    let now = Utc::now();
    let new_user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(body.email.clone()),
        password_hash: Set(password_hash),
        first_name: Set(body.first_name.clone()),
        last_name: Set(body.last_name.clone()),
        role: Set(body.role.clone()),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let user = match new_user.insert(db.get_ref()).await {
        Ok(user) => user,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to create user: {}", e)
            }));
        }
    };

    // 5. Générer le JWT
    let token = match jwt::generate_token(user.id, &user.email, user.role.clone()) {
        Ok(token) => token,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to generate token: {}", e)
            }));
        }
    };

    HttpResponse::Created().json(AuthResponse {
        token,
        user_id: user.id,
        email: user.email,
        role: user.role,
    })
}

/// POST /auth/login - Se connecter (PUBLIC)
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Trouver l'utilisateur
    let user = Users::find()
        .filter(UserColumn::Email.eq(&body.email))
        .one(db.get_ref())
        .await;

    let user = match user {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "Invalid email or password"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
    };

    // 2. Vérifier le mot de passe
    match password::verify_password(&body.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) | Err(_) => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "Invalid email or password"
            }));
        }
    }

    // 3. Générer le JWT
    let token = match jwt::generate_token(user.id, &user.email, user.role.clone()) {
        Ok(token) => token,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to generate token: {}", e)
            }));
        }
    };

    HttpResponse::Ok().json(AuthResponse {
        token,
        user_id: user.id,
        email: user.email,
        role: user.role,
    })
}

/// GET /auth/me - Infos de l'utilisateur connecté
#[get("/me")]
pub async fn me(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match Users::find_by_id(auth_user.user_id).one(db.get_ref()).await {
        Ok(Some(user)) => HttpResponse::Ok().json(MeResponse {
            user_id: user.id,
            email: user.email.clone(),
            full_name: user.full_name(),
            role: user.role,
        }),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "User not found"
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {}", e)
        })),
    }
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(register)
            .service(login)
            .service(me)
    );
}
