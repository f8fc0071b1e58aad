/// Negotiation notes attached to a deal
use crate::db::{deals, negotiations};
use crate::error::AppError;
use crate::middleware::UserId;
use crate::models::NoteKind;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    pub body: String,
    pub kind: Option<NoteKind>,
}

pub async fn create(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
    payload: web::Json<NoteRequest>,
) -> Result<HttpResponse, AppError> {
    if payload.body.trim().is_empty() {
        return Err(AppError::Validation("Note body cannot be empty".to_string()));
    }

    let deal_id = path.into_inner();
    deals::find_by_id(&pool, user_id.0, deal_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Deal not found".to_string()))?;

    let note = negotiations::create(
        &pool,
        deal_id,
        user_id.0,
        &payload.body,
        payload.kind.unwrap_or(NoteKind::Note),
    )
    .await?;
    Ok(HttpResponse::Created().json(note))
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

    let notes = negotiations::list_by_deal(&pool, deal_id).await?;
    Ok(HttpResponse::Ok().json(notes))
}

pub async fn remove(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    if !negotiations::delete(&pool, user_id.0, path.into_inner()).await? {
        return Err(AppError::NotFound("Note not found".to_string()));
    }
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/deals/{id}/notes", web::post().to(create))
        .route("/deals/{id}/notes", web::get().to(list))
        .route("/notes/{id}", web::delete().to(remove));
}
