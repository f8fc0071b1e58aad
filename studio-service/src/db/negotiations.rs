use crate::models::{NegotiationNote, NoteKind};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create(
    pool: &PgPool,
    deal_id: Uuid,
    author_id: Uuid,
    body: &str,
    kind: NoteKind,
) -> Result<NegotiationNote, sqlx::Error> {
    sqlx::query_as::<_, NegotiationNote>(
        r#"
        INSERT INTO negotiation_notes (deal_id, author_id, body, kind)
        VALUES ($1, $2, $3, $4)
        RETURNING id, deal_id, author_id, body, kind, created_at
        "#,
    )
    .bind(deal_id)
    .bind(author_id)
    .bind(body)
    .bind(kind)
    .fetch_one(pool)
    .await
}

pub async fn list_by_deal(
    pool: &PgPool,
    deal_id: Uuid,
) -> Result<Vec<NegotiationNote>, sqlx::Error> {
    sqlx::query_as::<_, NegotiationNote>(
        r#"
        SELECT id, deal_id, author_id, body, kind, created_at
        FROM negotiation_notes
        WHERE deal_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(deal_id)
    .fetch_all(pool)
    .await
}

pub async fn delete(pool: &PgPool, author_id: Uuid, note_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM negotiation_notes WHERE id = $1 AND author_id = $2")
        .bind(note_id)
        .bind(author_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
