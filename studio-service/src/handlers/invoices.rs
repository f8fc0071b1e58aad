/// Invoice tracking
use crate::db::invoices::{self, NewInvoice};
use crate::error::AppError;
use crate::middleware::UserId;
use crate::models::InvoiceStatus;
use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct InvoiceRequest {
    pub deal_id: Option<Uuid>,
    #[validate(length(min = 1, max = 64))]
    pub invoice_number: String,
    pub amount: f64,
    pub currency: Option<String>,
    pub issued_at: Option<NaiveDate>,
    pub due_at: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: Option<String>,
}

pub async fn create(
    pool: web::Data<PgPool>,
    user_id: UserId,
    payload: web::Json<InvoiceRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    if payload.amount < 0.0 {
        return Err(AppError::Validation(
            "Invoice amount cannot be negative".to_string(),
        ));
    }

    let invoice = invoices::create(
        &pool,
        user_id.0,
        NewInvoice {
            deal_id: payload.deal_id,
            invoice_number: &payload.invoice_number,
            amount: payload.amount,
            currency: payload.currency.as_deref().unwrap_or("USD"),
            issued_at: payload.issued_at,
            due_at: payload.due_at,
        },
    )
    .await?;
    Ok(HttpResponse::Created().json(invoice))
}

pub async fn list(pool: web::Data<PgPool>, user_id: UserId) -> Result<HttpResponse, AppError> {
    let invoices = invoices::list_by_user(&pool, user_id.0).await?;
    Ok(HttpResponse::Ok().json(invoices))
}

pub async fn get(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let invoice = invoices::find_by_id(&pool, user_id.0, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Invoice not found".to_string()))?;
    Ok(HttpResponse::Ok().json(invoice))
}

pub async fn update_status(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
    payload: web::Json<StatusRequest>,
) -> Result<HttpResponse, AppError> {
    let raw = payload
        .status
        .as_deref()
        .ok_or_else(|| AppError::Validation("Missing 'status' field".to_string()))?;
    let status = InvoiceStatus::from_str(raw)
        .ok_or_else(|| AppError::Validation(format!("Unknown invoice status '{raw}'")))?;

    let invoice = invoices::update_status(&pool, user_id.0, path.into_inner(), status)
        .await?
        .ok_or_else(|| AppError::NotFound("Invoice not found".to_string()))?;
    Ok(HttpResponse::Ok().json(invoice))
}

pub async fn remove(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    if !invoices::delete(&pool, user_id.0, path.into_inner()).await? {
        return Err(AppError::NotFound("Invoice not found".to_string()));
    }
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/invoices", web::post().to(create))
        .route("/invoices", web::get().to(list))
        .route("/invoices/{id}", web::get().to(get))
        .route("/invoices/{id}/status", web::patch().to(update_status))
        .route("/invoices/{id}", web::delete().to(remove));
}
