use crate::models::{AiInteraction, AiKind};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn record(
    pool: &PgPool,
    user_id: Uuid,
    kind: AiKind,
    provider: &str,
    prompt: &str,
    response: Option<&str>,
) -> Result<AiInteraction, sqlx::Error> {
    sqlx::query_as::<_, AiInteraction>(
        r#"
        INSERT INTO ai_interactions (user_id, kind, provider, prompt, response)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, kind, provider, prompt, response, created_at
        "#,
    )
    .bind(user_id)
    .bind(kind)
    .bind(provider)
    .bind(prompt)
    .bind(response)
    .fetch_one(pool)
    .await
}

pub async fn list_by_user(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<AiInteraction>, sqlx::Error> {
    sqlx::query_as::<_, AiInteraction>(
        r#"
        SELECT id, user_id, kind, provider, prompt, response, created_at
        FROM ai_interactions
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}
