/// Deliverables attached to a deal
use crate::db::{deals, deliverables};
use crate::error::AppError;
use crate::middleware::UserId;
use crate::models::{DeliverableStatus, Platform};
use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDeliverableRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub platform: Option<Platform>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: DeliverableStatus,
}

pub async fn create(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
    payload: web::Json<CreateDeliverableRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let deal_id = path.into_inner();
    deals::find_by_id(&pool, user_id.0, deal_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Deal not found".to_string()))?;

    let deliverable = deliverables::create(
        &pool,
        deal_id,
        &payload.title,
        payload.platform,
        payload.due_date,
    )
    .await?;
    Ok(HttpResponse::Created().json(deliverable))
}

pub async fn list(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let deal_id = path.into_inner();
    deals::find_by_id(&pool, user_id.0, deal_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Deal not found".to_string()))?;

    let deliverables = deliverables::list_by_deal(&pool, deal_id).await?;
    Ok(HttpResponse::Ok().json(deliverables))
}

pub async fn update_status(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
    payload: web::Json<StatusRequest>,
) -> Result<HttpResponse, AppError> {
    let deliverable =
        deliverables::update_status(&pool, user_id.0, path.into_inner(), payload.status)
            .await?
            .ok_or_else(|| AppError::NotFound("Deliverable not found".to_string()))?;
    Ok(HttpResponse::Ok().json(deliverable))
}

pub async fn remove(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    if !deliverables::delete(&pool, user_id.0, path.into_inner()).await? {
        return Err(AppError::NotFound("Deliverable not found".to_string()));
    }
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/deals/{id}/deliverables", web::post().to(create))
        .route("/deals/{id}/deliverables", web::get().to(list))
        .route("/deliverables/{id}/status", web::patch().to(update_status))
        .route("/deliverables/{id}", web::delete().to(remove));
}
