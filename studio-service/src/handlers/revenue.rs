/// Revenue ledger plus the per-month summary
use crate::db::revenue::{self, NewRevenueEntry};
use crate::error::AppError;
use crate::middleware::UserId;
use crate::services::analytics;
use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct RevenueRequest {
    pub deal_id: Option<Uuid>,
    pub amount: f64,
    pub currency: Option<String>,
    pub source: Option<String>,
    pub entry_date: NaiveDate,
    pub notes: Option<String>,
}

pub async fn create(
    pool: web::Data<PgPool>,
    user_id: UserId,
    payload: web::Json<RevenueRequest>,
) -> Result<HttpResponse, AppError> {
    let entry = revenue::create(
        &pool,
        user_id.0,
        NewRevenueEntry {
            deal_id: payload.deal_id,
            amount: payload.amount,
            currency: payload.currency.as_deref().unwrap_or("USD"),
            source: payload.source.as_deref(),
            entry_date: payload.entry_date,
            notes: payload.notes.as_deref(),
        },
    )
    .await?;
    Ok(HttpResponse::Created().json(entry))
}

pub async fn list(pool: web::Data<PgPool>, user_id: UserId) -> Result<HttpResponse, AppError> {
    let entries = revenue::list_by_user(&pool, user_id.0).await?;
    Ok(HttpResponse::Ok().json(entries))
}

/// Total and per-month revenue figures.
pub async fn summary(pool: web::Data<PgPool>, user_id: UserId) -> Result<HttpResponse, AppError> {
    let entries: Vec<(NaiveDate, f64)> = revenue::list_by_user(&pool, user_id.0)
        .await?
        .into_iter()
        .map(|e| (e.entry_date, e.amount))
        .collect();
    Ok(HttpResponse::Ok().json(analytics::summarize_revenue(&entries)))
}

pub async fn remove(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    if !revenue::delete(&pool, user_id.0, path.into_inner()).await? {
        return Err(AppError::NotFound("Revenue entry not found".to_string()));
    }
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/revenue", web::post().to(create))
        .route("/revenue", web::get().to(list))
        .route("/revenue/summary", web::get().to(summary))
        .route("/revenue/{id}", web::delete().to(remove));
}
