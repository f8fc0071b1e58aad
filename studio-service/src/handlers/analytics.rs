/// Dashboard aggregation endpoint
use crate::error::AppError;
use crate::middleware::UserId;
use crate::services::analytics;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

pub async fn dashboard(pool: web::Data<PgPool>, user_id: UserId) -> Result<HttpResponse, AppError> {
    let summary = analytics::dashboard(&pool, user_id.0).await?;
    Ok(HttpResponse::Ok().json(summary))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/analytics/dashboard", web::get().to(dashboard));
}
