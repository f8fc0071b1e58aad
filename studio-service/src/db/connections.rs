use crate::models::{Platform, PlatformConnection};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub struct StoredTokens<'a> {
    pub access_token: &'a str,
    pub refresh_token: Option<&'a str>,
    pub expires_at: Option<DateTime<Utc>>,
    pub platform_user_id: Option<&'a str>,
}

/// Insert or refresh a user's credential for a platform. A re-authorization
/// replaces the stored tokens and reactivates the connection.
pub async fn upsert(
    pool: &PgPool,
    user_id: Uuid,
    platform: Platform,
    tokens: StoredTokens<'_>,
) -> Result<PlatformConnection, sqlx::Error> {
    sqlx::query_as::<_, PlatformConnection>(
        r#"
        INSERT INTO platform_connections
            (user_id, platform, access_token, refresh_token, expires_at, platform_user_id, active)
        VALUES ($1, $2, $3, $4, $5, $6, TRUE)
        ON CONFLICT (user_id, platform) DO UPDATE
        SET access_token = EXCLUDED.access_token,
            refresh_token = COALESCE(EXCLUDED.refresh_token, platform_connections.refresh_token),
            expires_at = EXCLUDED.expires_at,
            platform_user_id = COALESCE(EXCLUDED.platform_user_id, platform_connections.platform_user_id),
            active = TRUE,
            updated_at = NOW()
        RETURNING id, user_id, platform, access_token, refresh_token, expires_at,
                  platform_user_id, active, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(platform)
    .bind(tokens.access_token)
    .bind(tokens.refresh_token)
    .bind(tokens.expires_at)
    .bind(tokens.platform_user_id)
    .fetch_one(pool)
    .await
}

pub async fn list_by_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<PlatformConnection>, sqlx::Error> {
    sqlx::query_as::<_, PlatformConnection>(
        r#"
        SELECT id, user_id, platform, access_token, refresh_token, expires_at,
               platform_user_id, active, created_at, updated_at
        FROM platform_connections
        WHERE user_id = $1
        ORDER BY platform
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Active credentials only, as consumed by the publish path
pub async fn list_active_by_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<PlatformConnection>, sqlx::Error> {
    sqlx::query_as::<_, PlatformConnection>(
        r#"
        SELECT id, user_id, platform, access_token, refresh_token, expires_at,
               platform_user_id, active, created_at, updated_at
        FROM platform_connections
        WHERE user_id = $1 AND active = TRUE
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn find_active(
    pool: &PgPool,
    user_id: Uuid,
    platform: Platform,
) -> Result<Option<PlatformConnection>, sqlx::Error> {
    sqlx::query_as::<_, PlatformConnection>(
        r#"
        SELECT id, user_id, platform, access_token, refresh_token, expires_at,
               platform_user_id, active, created_at, updated_at
        FROM platform_connections
        WHERE user_id = $1 AND platform = $2 AND active = TRUE
        "#,
    )
    .bind(user_id)
    .bind(platform)
    .fetch_optional(pool)
    .await
}

/// Disconnect: keep the row for audit, flip the active flag off.
pub async fn deactivate(
    pool: &PgPool,
    user_id: Uuid,
    platform: Platform,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE platform_connections
        SET active = FALSE, updated_at = NOW()
        WHERE user_id = $1 AND platform = $2 AND active = TRUE
        "#,
    )
    .bind(user_id)
    .bind(platform)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
