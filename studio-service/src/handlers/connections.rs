/// Platform connection management and OAuth callback
use crate::db::connections::{self, StoredTokens};
use crate::error::AppError;
use crate::middleware::UserId;
use crate::models::Platform;
use crate::platforms::gmail;
use crate::security::TokenIssuer;
use crate::services::OAuthService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;

fn parse_platform(raw: &str) -> Result<Platform, AppError> {
    Platform::from_str(raw)
        .ok_or_else(|| AppError::Validation(format!("Unknown platform '{raw}'")))
}

pub async fn list(pool: web::Data<PgPool>, user_id: UserId) -> Result<HttpResponse, AppError> {
    let connections = connections::list_by_user(&pool, user_id.0).await?;
    Ok(HttpResponse::Ok().json(connections))
}

/// Start an authorization flow: mint a state token and hand back the
/// provider URL for the client to redirect to.
pub async fn auth_url(
    oauth: web::Data<OAuthService>,
    issuer: web::Data<TokenIssuer>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let platform = parse_platform(&path)?;
    let state = issuer.issue_oauth_state(user_id.0, platform.as_str())?;
    let url = oauth.auth_url(platform, &state)?;

    Ok(HttpResponse::Ok().json(json!({ "url": url })))
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Provider redirect target. Arrives without a bearer token; the user is
/// recovered from the signed state parameter.
pub async fn callback(
    pool: web::Data<PgPool>,
    oauth: web::Data<OAuthService>,
    issuer: web::Data<TokenIssuer>,
    path: web::Path<String>,
    query: web::Query<CallbackQuery>,
) -> Result<HttpResponse, AppError> {
    let platform = parse_platform(&path)?;

    if let Some(error) = &query.error {
        return Err(AppError::Validation(format!(
            "Authorization denied by provider: {error}"
        )));
    }
    let code = query
        .code
        .as_deref()
        .ok_or_else(|| AppError::Validation("Missing 'code' parameter".to_string()))?;
    let state = query
        .state
        .as_deref()
        .ok_or_else(|| AppError::Validation("Missing 'state' parameter".to_string()))?;

    let (user_id, state_platform) = issuer.validate_oauth_state(state)?;
    if state_platform != platform.as_str() {
        return Err(AppError::Validation(
            "State token does not match the callback platform".to_string(),
        ));
    }

    let tokens = oauth.exchange_code(platform, code).await?;
    let connection = connections::upsert(
        &pool,
        user_id,
        platform,
        StoredTokens {
            access_token: &tokens.access_token,
            refresh_token: tokens.refresh_token.as_deref(),
            expires_at: tokens.expires_at,
            platform_user_id: tokens.platform_user_id.as_deref(),
        },
    )
    .await?;
    tracing::info!(%user_id, platform = platform.as_str(), "platform connected");

    Ok(HttpResponse::Ok().json(connection))
}

pub async fn disconnect(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let platform = parse_platform(&path)?;
    if !connections::deactivate(&pool, user_id.0, platform).await? {
        return Err(AppError::NotFound("Connection not found".to_string()));
    }
    Ok(HttpResponse::NoContent().finish())
}

#[derive(Debug, Deserialize)]
pub struct InboxQuery {
    pub limit: Option<u32>,
}

/// Recent Gmail inbox messages for the connected account, used as input to
/// the email parsing helper.
pub async fn gmail_messages(
    pool: web::Data<PgPool>,
    http: web::Data<reqwest::Client>,
    user_id: UserId,
    query: web::Query<InboxQuery>,
) -> Result<HttpResponse, AppError> {
    let conn = connections::find_active(&pool, user_id.0, Platform::Gmail)
        .await?
        .ok_or_else(|| AppError::NotFound("Gmail is not connected".to_string()))?;

    let limit = query.limit.unwrap_or(10).min(50);
    let messages = gmail::fetch_recent_messages(&http, &conn, limit).await?;

    Ok(HttpResponse::Ok().json(messages))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/connections", web::get().to(list))
        .route("/connections/gmail/messages", web::get().to(gmail_messages))
        .route("/connections/{platform}/auth-url", web::get().to(auth_url))
        .route("/connections/{platform}", web::delete().to(disconnect));
}
