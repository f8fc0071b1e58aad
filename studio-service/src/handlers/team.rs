/// Team member roster
use crate::db::team;
use crate::error::AppError;
use crate::middleware::UserId;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct TeamMemberRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub role: Option<String>,
}

pub async fn create(
    pool: web::Data<PgPool>,
    user_id: UserId,
    payload: web::Json<TeamMemberRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let member = team::create(
        &pool,
        user_id.0,
        &payload.name,
        payload.email.as_deref(),
        payload.role.as_deref().unwrap_or("member"),
    )
    .await?;
    Ok(HttpResponse::Created().json(member))
}

pub async fn list(pool: web::Data<PgPool>, user_id: UserId) -> Result<HttpResponse, AppError> {
    let members = team::list_by_user(&pool, user_id.0).await?;
    Ok(HttpResponse::Ok().json(members))
}

pub async fn remove(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    if !team::delete(&pool, user_id.0, path.into_inner()).await? {
        return Err(AppError::NotFound("Team member not found".to_string()));
    }
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/team", web::post().to(create))
        .route("/team", web::get().to(list))
        .route("/team/{id}", web::delete().to(remove));
}
