use crate::models::{ContentPost, MediaType, Platform, PlatformPostStatus, PostPlatform, PostStatus};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const POST_COLUMNS: &str = r#"id, user_id, deal_id, title, body, media_type, media_url,
    youtube_title, youtube_description, youtube_tags, instagram_caption, linkedin_text,
    twitter_text, status, scheduled_at, published_at, youtube_video_id, instagram_media_id,
    linkedin_post_id, tweet_id, last_error, created_at, updated_at"#;

pub struct NewPost<'a> {
    pub deal_id: Option<Uuid>,
    pub title: &'a str,
    pub body: &'a str,
    pub media_type: MediaType,
    pub media_url: Option<&'a str>,
    pub youtube_title: Option<&'a str>,
    pub youtube_description: Option<&'a str>,
    pub youtube_tags: Option<&'a str>,
    pub instagram_caption: Option<&'a str>,
    pub linkedin_text: Option<&'a str>,
    pub twitter_text: Option<&'a str>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

pub async fn create(
    pool: &PgPool,
    user_id: Uuid,
    post: NewPost<'_>,
    status: PostStatus,
) -> Result<ContentPost, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO content_posts
            (user_id, deal_id, title, body, media_type, media_url,
             youtube_title, youtube_description, youtube_tags, instagram_caption,
             linkedin_text, twitter_text, status, scheduled_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING {POST_COLUMNS}
        "#
    );
    sqlx::query_as::<_, ContentPost>(&sql)
        .bind(user_id)
        .bind(post.deal_id)
        .bind(post.title)
        .bind(post.body)
        .bind(post.media_type)
        .bind(post.media_url)
        .bind(post.youtube_title)
        .bind(post.youtube_description)
        .bind(post.youtube_tags)
        .bind(post.instagram_caption)
        .bind(post.linkedin_text)
        .bind(post.twitter_text)
        .bind(status)
        .bind(post.scheduled_at)
        .fetch_one(pool)
        .await
}

pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<ContentPost>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {POST_COLUMNS}
        FROM content_posts
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#
    );
    sqlx::query_as::<_, ContentPost>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(
    pool: &PgPool,
    user_id: Uuid,
    post_id: Uuid,
) -> Result<Option<ContentPost>, sqlx::Error> {
    let sql = format!("SELECT {POST_COLUMNS} FROM content_posts WHERE id = $1 AND user_id = $2");
    sqlx::query_as::<_, ContentPost>(&sql)
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Load a post without an ownership scope. Used by the scheduler, which
/// works from claimed ids rather than a request context.
pub async fn load(pool: &PgPool, post_id: Uuid) -> Result<Option<ContentPost>, sqlx::Error> {
    let sql = format!("SELECT {POST_COLUMNS} FROM content_posts WHERE id = $1");
    sqlx::query_as::<_, ContentPost>(&sql)
        .bind(post_id)
        .fetch_optional(pool)
        .await
}

/// Update the editable fields. Only draft and scheduled posts may change;
/// the WHERE clause enforces that in the same statement.
pub async fn update(
    pool: &PgPool,
    user_id: Uuid,
    post_id: Uuid,
    post: NewPost<'_>,
    status: PostStatus,
) -> Result<Option<ContentPost>, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE content_posts
        SET deal_id = $1, title = $2, body = $3, media_type = $4, media_url = $5,
            youtube_title = $6, youtube_description = $7, youtube_tags = $8,
            instagram_caption = $9, linkedin_text = $10, twitter_text = $11,
            status = $12, scheduled_at = $13, updated_at = NOW()
        WHERE id = $14 AND user_id = $15 AND status IN ('draft', 'scheduled')
        RETURNING {POST_COLUMNS}
        "#
    );
    sqlx::query_as::<_, ContentPost>(&sql)
        .bind(post.deal_id)
        .bind(post.title)
        .bind(post.body)
        .bind(post.media_type)
        .bind(post.media_url)
        .bind(post.youtube_title)
        .bind(post.youtube_description)
        .bind(post.youtube_tags)
        .bind(post.instagram_caption)
        .bind(post.linkedin_text)
        .bind(post.twitter_text)
        .bind(status)
        .bind(post.scheduled_at)
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn delete(pool: &PgPool, user_id: Uuid, post_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM content_posts WHERE id = $1 AND user_id = $2")
        .bind(post_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Replace the platform targets of a post with one pending row per platform.
pub async fn set_platform_targets(
    pool: &PgPool,
    post_id: Uuid,
    platforms: &[Platform],
) -> Result<Vec<PostPlatform>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM post_platforms WHERE post_id = $1")
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

    let mut targets = Vec::with_capacity(platforms.len());
    for platform in platforms {
        let target = sqlx::query_as::<_, PostPlatform>(
            r#"
            INSERT INTO post_platforms (post_id, platform)
            VALUES ($1, $2)
            ON CONFLICT (post_id, platform) DO NOTHING
            RETURNING id, post_id, platform, status, external_id, error_message, published_at,
                      created_at, updated_at
            "#,
        )
        .bind(post_id)
        .bind(platform)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(target) = target {
            targets.push(target);
        }
    }

    tx.commit().await?;
    Ok(targets)
}

pub async fn list_targets(pool: &PgPool, post_id: Uuid) -> Result<Vec<PostPlatform>, sqlx::Error> {
    sqlx::query_as::<_, PostPlatform>(
        r#"
        SELECT id, post_id, platform, status, external_id, error_message, published_at,
               created_at, updated_at
        FROM post_platforms
        WHERE post_id = $1
        ORDER BY platform
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
}

pub async fn pending_targets(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Vec<PostPlatform>, sqlx::Error> {
    sqlx::query_as::<_, PostPlatform>(
        r#"
        SELECT id, post_id, platform, status, external_id, error_message, published_at,
               created_at, updated_at
        FROM post_platforms
        WHERE post_id = $1 AND status = 'pending'
        ORDER BY platform
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
}

pub async fn mark_target_publishing(pool: &PgPool, target_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE post_platforms SET status = 'publishing', updated_at = NOW() WHERE id = $1",
    )
    .bind(target_id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn mark_target_published(
    pool: &PgPool,
    target_id: Uuid,
    external_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE post_platforms
        SET status = 'published', external_id = $1, error_message = NULL,
            published_at = NOW(), updated_at = NOW()
        WHERE id = $2
        "#,
    )
    .bind(external_id)
    .bind(target_id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn mark_target_failed(
    pool: &PgPool,
    target_id: Uuid,
    error_message: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE post_platforms
        SET status = 'failed', error_message = $1, updated_at = NOW()
        WHERE id = $2
        "#,
    )
    .bind(error_message)
    .bind(target_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Reset failed targets back to pending ahead of a manual publish-now pass.
pub async fn reset_failed_targets(pool: &PgPool, post_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE post_platforms
        SET status = 'pending', error_message = NULL, updated_at = NOW()
        WHERE post_id = $1 AND status = 'failed'
        "#,
    )
    .bind(post_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Store the provider-assigned id on the post's per-platform column.
pub async fn set_post_external_id(
    pool: &PgPool,
    post_id: Uuid,
    platform: Platform,
    external_id: &str,
) -> Result<(), sqlx::Error> {
    let column = match platform {
        Platform::Youtube => "youtube_video_id",
        Platform::Instagram => "instagram_media_id",
        Platform::Linkedin => "linkedin_post_id",
        Platform::Twitter => "tweet_id",
        Platform::Gmail => return Ok(()),
    };

    let sql = format!(
        "UPDATE content_posts SET {column} = $1, updated_at = NOW() WHERE id = $2"
    );
    sqlx::query(&sql)
        .bind(external_id)
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Atomically claim due posts for publication. Moving claimed rows to
/// `publishing` in the same statement keeps a concurrent scan (or a manual
/// publish-now) from picking up the same post twice.
pub async fn claim_due_posts(pool: &PgPool, limit: i64) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        UPDATE content_posts
        SET status = 'publishing', updated_at = NOW()
        WHERE id IN (
            SELECT id FROM content_posts
            WHERE status = 'scheduled' AND scheduled_at <= NOW()
            ORDER BY scheduled_at ASC
            LIMIT $1
            FOR UPDATE SKIP LOCKED
        )
        RETURNING id
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Claim a single post for a manual publish-now pass. Failed posts may be
/// re-driven; published posts may not.
pub async fn claim_for_manual_publish(
    pool: &PgPool,
    user_id: Uuid,
    post_id: Uuid,
) -> Result<Option<ContentPost>, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE content_posts
        SET status = 'publishing', last_error = NULL, updated_at = NOW()
        WHERE id = $1 AND user_id = $2 AND status IN ('draft', 'scheduled', 'failed')
        RETURNING {POST_COLUMNS}
        "#
    );
    sqlx::query_as::<_, ContentPost>(&sql)
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Remaining (pending or publishing) and failed target counts for a post.
pub async fn target_counts(pool: &PgPool, post_id: Uuid) -> Result<(i64, i64), sqlx::Error> {
    sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT
            COUNT(*) FILTER (WHERE status IN ('pending', 'publishing')),
            COUNT(*) FILTER (WHERE status = 'failed')
        FROM post_platforms
        WHERE post_id = $1
        "#,
    )
    .bind(post_id)
    .fetch_one(pool)
    .await
}

pub async fn finalize_status(
    pool: &PgPool,
    post_id: Uuid,
    status: PostStatus,
    last_error: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE content_posts
        SET status = $1,
            last_error = $2,
            published_at = CASE WHEN $1 = 'published'::post_status THEN NOW() ELSE published_at END,
            updated_at = NOW()
        WHERE id = $3
        "#,
    )
    .bind(status)
    .bind(last_error)
    .bind(post_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Post counts grouped by lifecycle status, used by the dashboard
pub async fn counts_by_status(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<(PostStatus, i64)>, sqlx::Error> {
    sqlx::query_as::<_, (PostStatus, i64)>(
        r#"
        SELECT status, COUNT(*)
        FROM content_posts
        WHERE user_id = $1
        GROUP BY status
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Target status snapshot used when re-marking targets for manual publish.
pub async fn targets_with_status(
    pool: &PgPool,
    post_id: Uuid,
    status: PlatformPostStatus,
) -> Result<Vec<PostPlatform>, sqlx::Error> {
    sqlx::query_as::<_, PostPlatform>(
        r#"
        SELECT id, post_id, platform, status, external_id, error_message, published_at,
               created_at, updated_at
        FROM post_platforms
        WHERE post_id = $1 AND status = $2
        ORDER BY platform
        "#,
    )
    .bind(post_id)
    .bind(status)
    .fetch_all(pool)
    .await
}
