use crate::models::{Ticket, TicketPriority, TicketStatus};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create(
    pool: &PgPool,
    user_id: Uuid,
    subject: &str,
    body: Option<&str>,
    priority: TicketPriority,
) -> Result<Ticket, sqlx::Error> {
    sqlx::query_as::<_, Ticket>(
        r#"
        INSERT INTO tickets (user_id, subject, body, priority)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, subject, body, status, priority, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(subject)
    .bind(body)
    .bind(priority)
    .fetch_one(pool)
    .await
}

pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Ticket>, sqlx::Error> {
    sqlx::query_as::<_, Ticket>(
        r#"
        SELECT id, user_id, subject, body, status, priority, created_at, updated_at
        FROM tickets
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn update_status(
    pool: &PgPool,
    user_id: Uuid,
    ticket_id: Uuid,
    status: TicketStatus,
) -> Result<Option<Ticket>, sqlx::Error> {
    sqlx::query_as::<_, Ticket>(
        r#"
        UPDATE tickets
        SET status = $1, updated_at = NOW()
        WHERE id = $2 AND user_id = $3
        RETURNING id, user_id, subject, body, status, priority, created_at, updated_at
        "#,
    )
    .bind(status)
    .bind(ticket_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, user_id: Uuid, ticket_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tickets WHERE id = $1 AND user_id = $2")
        .bind(ticket_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
