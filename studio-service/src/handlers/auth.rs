/// Registration, login and current-user lookup
use crate::db::users;
use crate::error::AppError;
use crate::middleware::UserId;
use crate::models::User;
use crate::security::{self, TokenIssuer};
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 120))]
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    )
}

pub async fn register(
    pool: web::Data<PgPool>,
    issuer: web::Data<TokenIssuer>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let password_hash = security::hash_password(&payload.password)?;

    let user = users::create_user(&pool, &payload.email, &password_hash, &payload.display_name)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                AppError::Conflict("Email already registered".to_string())
            } else {
                AppError::from(err)
            }
        })?;

    let token = issuer.issue(user.id)?;
    tracing::info!(user_id = %user.id, "user registered");

    Ok(HttpResponse::Created().json(AuthResponse { token, user }))
}

pub async fn login(
    pool: web::Data<PgPool>,
    issuer: web::Data<TokenIssuer>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let user = users::find_by_email(&pool, &payload.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    if !security::verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let token = issuer.issue(user.id)?;

    Ok(HttpResponse::Ok().json(AuthResponse { token, user }))
}

pub async fn me(pool: web::Data<PgPool>, user_id: UserId) -> Result<HttpResponse, AppError> {
    let user = users::find_by_id(&pool, user_id.0)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(user))
}

pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.route("/register", web::post().to(register))
        .route("/login", web::post().to(login));
}
