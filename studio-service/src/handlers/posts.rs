/// Content post CRUD, platform targeting and publish-now
use crate::db::posts::{self, NewPost};
use crate::error::AppError;
use crate::jobs::PublishQueue;
use crate::middleware::UserId;
use crate::models::{ContentPost, MediaType, Platform, PostPlatform, PostStatus};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct PostRequest {
    pub deal_id: Option<Uuid>,
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    pub body: String,
    pub media_type: Option<MediaType>,
    pub media_url: Option<String>,
    pub youtube_title: Option<String>,
    pub youtube_description: Option<String>,
    pub youtube_tags: Option<String>,
    pub instagram_caption: Option<String>,
    pub linkedin_text: Option<String>,
    pub twitter_text: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub platforms: Vec<Platform>,
}

#[derive(Debug, Serialize)]
pub struct PostWithTargets {
    #[serde(flatten)]
    pub post: ContentPost,
    pub targets: Vec<PostPlatform>,
}

impl PostRequest {
    fn as_new_post(&self) -> NewPost<'_> {
        NewPost {
            deal_id: self.deal_id,
            title: &self.title,
            body: &self.body,
            media_type: self.media_type.unwrap_or(MediaType::Text),
            media_url: self.media_url.as_deref(),
            youtube_title: self.youtube_title.as_deref(),
            youtube_description: self.youtube_description.as_deref(),
            youtube_tags: self.youtube_tags.as_deref(),
            instagram_caption: self.instagram_caption.as_deref(),
            linkedin_text: self.linkedin_text.as_deref(),
            twitter_text: self.twitter_text.as_deref(),
            scheduled_at: self.scheduled_at,
        }
    }

    fn checked_platforms(&self) -> Result<&[Platform], AppError> {
        if self.platforms.is_empty() {
            return Err(AppError::Validation(
                "At least one target platform is required".to_string(),
            ));
        }
        if let Some(p) = self.platforms.iter().find(|p| !p.is_publish_target()) {
            return Err(AppError::Validation(format!(
                "{} is not a publishable platform",
                p.as_str()
            )));
        }
        Ok(&self.platforms)
    }

    /// A post with a schedule enters the pipeline as scheduled, otherwise it
    /// stays a draft.
    fn initial_status(&self) -> PostStatus {
        if self.scheduled_at.is_some() {
            PostStatus::Scheduled
        } else {
            PostStatus::Draft
        }
    }
}

pub async fn create(
    pool: web::Data<PgPool>,
    user_id: UserId,
    payload: web::Json<PostRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let platforms = payload.checked_platforms()?;

    let post = posts::create(&pool, user_id.0, payload.as_new_post(), payload.initial_status())
        .await?;
    let targets = posts::set_platform_targets(&pool, post.id, platforms).await?;
    tracing::info!(post_id = %post.id, targets = targets.len(), "content post created");

    Ok(HttpResponse::Created().json(PostWithTargets { post, targets }))
}

pub async fn list(pool: web::Data<PgPool>, user_id: UserId) -> Result<HttpResponse, AppError> {
    let posts = posts::list_by_user(&pool, user_id.0).await?;
    Ok(HttpResponse::Ok().json(posts))
}

pub async fn get(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let post_id = path.into_inner();
    let post = posts::find_by_id(&pool, user_id.0, post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;
    let targets = posts::list_targets(&pool, post_id).await?;

    Ok(HttpResponse::Ok().json(PostWithTargets { post, targets }))
}

pub async fn update(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
    payload: web::Json<PostRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let platforms = payload.checked_platforms()?;

    let post_id = path.into_inner();
    let existing = posts::find_by_id(&pool, user_id.0, post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;
    if !existing.status.is_editable() {
        return Err(AppError::Conflict(
            "Only draft or scheduled posts can be edited".to_string(),
        ));
    }

    let post = posts::update(
        &pool,
        user_id.0,
        post_id,
        payload.as_new_post(),
        payload.initial_status(),
    )
    .await?
    .ok_or_else(|| AppError::Conflict("Post is no longer editable".to_string()))?;
    let targets = posts::set_platform_targets(&pool, post_id, platforms).await?;

    Ok(HttpResponse::Ok().json(PostWithTargets { post, targets }))
}

/// Publish immediately, bypassing the schedule. Failed posts are re-driven:
/// their failed targets go back to pending, already-published targets are
/// left untouched.
pub async fn publish_now(
    pool: web::Data<PgPool>,
    queue: web::Data<PublishQueue>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let post_id = path.into_inner();

    let post = posts::claim_for_manual_publish(&pool, user_id.0, post_id)
        .await?
        .ok_or_else(|| {
            AppError::Conflict("Post is not in a publishable state".to_string())
        })?;
    let reset = posts::reset_failed_targets(&pool, post_id).await?;
    if reset > 0 {
        tracing::info!(%post_id, reset, "failed targets reset for manual publish");
    }

    if !queue.push(post_id).await {
        return Err(AppError::Internal("Publish queue is unavailable".to_string()));
    }

    Ok(HttpResponse::Accepted().json(post))
}

pub async fn remove(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    if !posts::delete(&pool, user_id.0, path.into_inner()).await? {
        return Err(AppError::NotFound("Post not found".to_string()));
    }
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/posts", web::post().to(create))
        .route("/posts", web::get().to(list))
        .route("/posts/{id}", web::get().to(get))
        .route("/posts/{id}", web::put().to(update))
        .route("/posts/{id}/publish", web::post().to(publish_now))
        .route("/posts/{id}", web::delete().to(remove));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with(platforms: Vec<Platform>) -> PostRequest {
        PostRequest {
            deal_id: None,
            title: "Launch week".to_string(),
            body: "It ships today".to_string(),
            media_type: None,
            media_url: None,
            youtube_title: None,
            youtube_description: None,
            youtube_tags: None,
            instagram_caption: None,
            linkedin_text: None,
            twitter_text: None,
            scheduled_at: None,
            platforms,
        }
    }

    #[test]
    fn test_one_target_per_requested_platform() {
        let request = request_with(vec![Platform::Youtube, Platform::Twitter]);
        let platforms = request.checked_platforms().expect("valid platforms");
        assert_eq!(platforms, [Platform::Youtube, Platform::Twitter]);
    }

    #[test]
    fn test_empty_platform_list_rejected() {
        let request = request_with(vec![]);
        assert!(matches!(
            request.checked_platforms(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_gmail_target_rejected() {
        let request = request_with(vec![Platform::Youtube, Platform::Gmail]);
        assert!(matches!(
            request.checked_platforms(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_schedule_decides_initial_status() {
        let mut request = request_with(vec![Platform::Twitter]);
        assert_eq!(request.initial_status(), PostStatus::Draft);

        request.scheduled_at = Some(Utc::now());
        assert_eq!(request.initial_status(), PostStatus::Scheduled);
    }
}
