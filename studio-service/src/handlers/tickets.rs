/// Support/task tickets
use crate::db::tickets;
use crate::error::AppError;
use crate::middleware::UserId;
use crate::models::{TicketPriority, TicketStatus};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct TicketRequest {
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    pub body: Option<String>,
    pub priority: Option<TicketPriority>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: TicketStatus,
}

pub async fn create(
    pool: web::Data<PgPool>,
    user_id: UserId,
    payload: web::Json<TicketRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let ticket = tickets::create(
        &pool,
        user_id.0,
        &payload.subject,
        payload.body.as_deref(),
        payload.priority.unwrap_or(TicketPriority::Medium),
    )
    .await?;
    Ok(HttpResponse::Created().json(ticket))
}

pub async fn list(pool: web::Data<PgPool>, user_id: UserId) -> Result<HttpResponse, AppError> {
    let tickets = tickets::list_by_user(&pool, user_id.0).await?;
    Ok(HttpResponse::Ok().json(tickets))
}

pub async fn update_status(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
    payload: web::Json<StatusRequest>,
) -> Result<HttpResponse, AppError> {
    let ticket = tickets::update_status(&pool, user_id.0, path.into_inner(), payload.status)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;
    Ok(HttpResponse::Ok().json(ticket))
}

pub async fn remove(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    if !tickets::delete(&pool, user_id.0, path.into_inner()).await? {
        return Err(AppError::NotFound("Ticket not found".to_string()));
    }
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/tickets", web::post().to(create))
        .route("/tickets", web::get().to(list))
        .route("/tickets/{id}/status", web::patch().to(update_status))
        .route("/tickets/{id}", web::delete().to(remove));
}
