/// Brand directory CRUD
use crate::db::brands::{self, NewBrand};
use crate::error::AppError;
use crate::middleware::UserId;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct BrandRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub contact_name: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub notes: Option<String>,
}

impl BrandRequest {
    fn as_new_brand(&self) -> NewBrand<'_> {
        NewBrand {
            name: &self.name,
            website: self.website.as_deref(),
            industry: self.industry.as_deref(),
            contact_name: self.contact_name.as_deref(),
            contact_email: self.contact_email.as_deref(),
            notes: self.notes.as_deref(),
        }
    }
}

pub async fn create(
    pool: web::Data<PgPool>,
    user_id: UserId,
    payload: web::Json<BrandRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let brand = brands::create(&pool, user_id.0, payload.as_new_brand()).await?;
    Ok(HttpResponse::Created().json(brand))
}

pub async fn list(pool: web::Data<PgPool>, user_id: UserId) -> Result<HttpResponse, AppError> {
    let brands = brands::list_by_user(&pool, user_id.0).await?;
    Ok(HttpResponse::Ok().json(brands))
}

pub async fn get(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let brand = brands::find_by_id(&pool, user_id.0, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Brand not found".to_string()))?;
    Ok(HttpResponse::Ok().json(brand))
}

pub async fn update(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
    payload: web::Json<BrandRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let brand = brands::update(&pool, user_id.0, path.into_inner(), payload.as_new_brand())
        .await?
        .ok_or_else(|| AppError::NotFound("Brand not found".to_string()))?;
    Ok(HttpResponse::Ok().json(brand))
}

pub async fn remove(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    if !brands::delete(&pool, user_id.0, path.into_inner()).await? {
        return Err(AppError::NotFound("Brand not found".to_string()));
    }
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/brands", web::post().to(create))
        .route("/brands", web::get().to(list))
        .route("/brands/{id}", web::get().to(get))
        .route("/brands/{id}", web::put().to(update))
        .route("/brands/{id}", web::delete().to(remove));
}
