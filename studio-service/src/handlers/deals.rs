/// Sponsorship deal pipeline CRUD and stage transitions
use crate::db::deals::{self, NewDeal};
use crate::error::AppError;
use crate::middleware::UserId;
use crate::models::DealStage;
use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct DealRequest {
    pub brand_id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub stage: Option<String>,
    pub amount: f64,
    pub currency: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DealListQuery {
    pub stage: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StageRequest {
    pub stage: Option<String>,
}

/// Parse a stage string, rejecting values outside the pipeline vocabulary.
fn parse_stage(raw: &str) -> Result<DealStage, AppError> {
    DealStage::from_str(raw)
        .ok_or_else(|| AppError::Validation(format!("Unknown deal stage '{raw}'")))
}

impl DealRequest {
    fn as_new_deal(&self) -> Result<NewDeal<'_>, AppError> {
        let stage = match self.stage.as_deref() {
            Some(raw) => parse_stage(raw)?,
            None => DealStage::Lead,
        };
        if self.amount < 0.0 {
            return Err(AppError::Validation(
                "Deal amount cannot be negative".to_string(),
            ));
        }
        Ok(NewDeal {
            brand_id: self.brand_id,
            title: &self.title,
            stage,
            amount: self.amount,
            currency: self.currency.as_deref().unwrap_or("USD"),
            start_date: self.start_date,
            due_date: self.due_date,
            notes: self.notes.as_deref(),
        })
    }
}

pub async fn create(
    pool: web::Data<PgPool>,
    user_id: UserId,
    payload: web::Json<DealRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let deal = deals::create(&pool, user_id.0, payload.as_new_deal()?).await?;
    tracing::info!(deal_id = %deal.id, stage = deal.stage.as_str(), "deal created");
    Ok(HttpResponse::Created().json(deal))
}

pub async fn list(
    pool: web::Data<PgPool>,
    user_id: UserId,
    query: web::Query<DealListQuery>,
) -> Result<HttpResponse, AppError> {
    let stage = query.stage.as_deref().map(parse_stage).transpose()?;
    let deals = deals::list_by_user(&pool, user_id.0, stage).await?;
    Ok(HttpResponse::Ok().json(deals))
}

pub async fn get(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let deal = deals::find_by_id(&pool, user_id.0, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Deal not found".to_string()))?;
    Ok(HttpResponse::Ok().json(deal))
}

pub async fn update(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
    payload: web::Json<DealRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let deal = deals::update(&pool, user_id.0, path.into_inner(), payload.as_new_deal()?)
        .await?
        .ok_or_else(|| AppError::NotFound("Deal not found".to_string()))?;
    Ok(HttpResponse::Ok().json(deal))
}

/// Move a deal along the pipeline. A missing or unknown stage is a 400, not
/// a silent no-op.
pub async fn update_stage(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
    payload: web::Json<StageRequest>,
) -> Result<HttpResponse, AppError> {
    let raw = payload
        .stage
        .as_deref()
        .ok_or_else(|| AppError::Validation("Missing 'stage' field".to_string()))?;
    let stage = parse_stage(raw)?;

    let deal = deals::update_stage(&pool, user_id.0, path.into_inner(), stage)
        .await?
        .ok_or_else(|| AppError::NotFound("Deal not found".to_string()))?;
    tracing::info!(deal_id = %deal.id, stage = deal.stage.as_str(), "deal stage updated");
    Ok(HttpResponse::Ok().json(deal))
}

pub async fn remove(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    if !deals::delete(&pool, user_id.0, path.into_inner()).await? {
        return Err(AppError::NotFound("Deal not found".to_string()));
    }
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/deals", web::post().to(create))
        .route("/deals", web::get().to(list))
        .route("/deals/{id}", web::get().to(get))
        .route("/deals/{id}", web::put().to(update))
        .route("/deals/{id}/stage", web::patch().to(update_stage))
        .route("/deals/{id}", web::delete().to(remove));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::UserId;
    use actix_web::dev::Service;
    use actix_web::http::StatusCode;
    use actix_web::{test, App, HttpMessage};
    use sqlx::postgres::PgPoolOptions;

    // The stage payload is validated before any query runs, so a lazy pool
    // that never connects is enough to exercise the rejection paths.
    macro_rules! stage_app {
        () => {{
            let pool = PgPoolOptions::new()
                .connect_lazy("postgresql://localhost/studio")
                .expect("lazy pool");

            test::init_service(
                App::new()
                    .app_data(web::Data::new(pool))
                    .wrap_fn(|req, srv| {
                        req.extensions_mut().insert(UserId(Uuid::new_v4()));
                        srv.call(req)
                    })
                    .route("/deals/{id}/stage", web::patch().to(update_stage)),
            )
            .await
        }};
    }

    #[actix_rt::test]
    async fn test_update_stage_rejects_missing_stage() {
        let app = stage_app!();

        let req = test::TestRequest::patch()
            .uri(&format!("/deals/{}/stage", Uuid::new_v4()))
            .set_json(serde_json::json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn test_update_stage_rejects_unknown_stage() {
        let app = stage_app!();

        let req = test::TestRequest::patch()
            .uri(&format!("/deals/{}/stage", Uuid::new_v4()))
            .set_json(serde_json::json!({ "stage": "won" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
