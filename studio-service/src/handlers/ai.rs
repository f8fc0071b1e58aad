/// AI helper routes
///
/// Each call is recorded in ai_interactions for the history view. When a
/// structured helper cannot decode the model's reply, the response is still
/// a 200 carrying `{"error": "parse_failed", "raw": ...}` so clients can
/// show the raw text instead of a failure page.
use crate::db::ai_interactions;
use crate::error::AppError;
use crate::middleware::UserId;
use crate::models::AiKind;
use crate::services::{AiOutcome, AiService};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;

#[derive(Debug, Deserialize)]
pub struct ParseEmailRequest {
    pub email_text: String,
}

#[derive(Debug, Deserialize)]
pub struct SuggestRateRequest {
    pub platform: String,
    pub followers: i64,
    pub engagement_rate: f64,
    pub niche: String,
}

#[derive(Debug, Deserialize)]
pub struct RepurposeRequest {
    pub body: String,
    pub target_platform: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

fn parse_failed_body(raw: &str) -> serde_json::Value {
    json!({ "error": "parse_failed", "raw": raw })
}

pub async fn parse_email(
    pool: web::Data<PgPool>,
    ai: web::Data<AiService>,
    user_id: UserId,
    payload: web::Json<ParseEmailRequest>,
) -> Result<HttpResponse, AppError> {
    if payload.email_text.trim().is_empty() {
        return Err(AppError::Validation("email_text cannot be empty".to_string()));
    }

    let outcome = ai.parse_email(&payload.email_text).await?;
    let body = match outcome {
        AiOutcome::Parsed(parsed) => serde_json::to_value(parsed)?,
        AiOutcome::ParseFailed { raw } => parse_failed_body(&raw),
    };

    ai_interactions::record(
        &pool,
        user_id.0,
        AiKind::ParseEmail,
        ai.provider(),
        &payload.email_text,
        serde_json::to_string(&body).ok().as_deref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(body))
}

pub async fn suggest_rate(
    pool: web::Data<PgPool>,
    ai: web::Data<AiService>,
    user_id: UserId,
    payload: web::Json<SuggestRateRequest>,
) -> Result<HttpResponse, AppError> {
    if payload.followers < 0 {
        return Err(AppError::Validation(
            "followers cannot be negative".to_string(),
        ));
    }

    let outcome = ai
        .suggest_rate(
            &payload.platform,
            payload.followers,
            payload.engagement_rate,
            &payload.niche,
        )
        .await?;
    let body = match outcome {
        AiOutcome::Parsed(suggestion) => serde_json::to_value(suggestion)?,
        AiOutcome::ParseFailed { raw } => parse_failed_body(&raw),
    };

    let prompt = format!(
        "{} / {} followers / {} engagement / {}",
        payload.platform, payload.followers, payload.engagement_rate, payload.niche
    );
    ai_interactions::record(
        &pool,
        user_id.0,
        AiKind::SuggestRate,
        ai.provider(),
        &prompt,
        serde_json::to_string(&body).ok().as_deref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(body))
}

pub async fn repurpose(
    pool: web::Data<PgPool>,
    ai: web::Data<AiService>,
    user_id: UserId,
    payload: web::Json<RepurposeRequest>,
) -> Result<HttpResponse, AppError> {
    if payload.body.trim().is_empty() {
        return Err(AppError::Validation("body cannot be empty".to_string()));
    }

    let rewritten = ai.repurpose(&payload.body, &payload.target_platform).await?;

    ai_interactions::record(
        &pool,
        user_id.0,
        AiKind::Repurpose,
        ai.provider(),
        &payload.body,
        Some(&rewritten),
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "content": rewritten })))
}

pub async fn history(
    pool: web::Data<PgPool>,
    user_id: UserId,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, AppError> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let interactions = ai_interactions::list_by_user(&pool, user_id.0, limit).await?;
    Ok(HttpResponse::Ok().json(interactions))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/ai/parse-email", web::post().to(parse_email))
        .route("/ai/suggest-rate", web::post().to(suggest_rate))
        .route("/ai/repurpose", web::post().to(repurpose))
        .route("/ai/history", web::get().to(history));
}
