use crate::models::{Deliverable, DeliverableStatus, Platform};
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create(
    pool: &PgPool,
    deal_id: Uuid,
    title: &str,
    platform: Option<Platform>,
    due_date: Option<NaiveDate>,
) -> Result<Deliverable, sqlx::Error> {
    sqlx::query_as::<_, Deliverable>(
        r#"
        INSERT INTO deliverables (deal_id, title, platform, due_date)
        VALUES ($1, $2, $3, $4)
        RETURNING id, deal_id, title, platform, due_date, status, created_at, updated_at
        "#,
    )
    .bind(deal_id)
    .bind(title)
    .bind(platform)
    .bind(due_date)
    .fetch_one(pool)
    .await
}

pub async fn list_by_deal(pool: &PgPool, deal_id: Uuid) -> Result<Vec<Deliverable>, sqlx::Error> {
    sqlx::query_as::<_, Deliverable>(
        r#"
        SELECT id, deal_id, title, platform, due_date, status, created_at, updated_at
        FROM deliverables
        WHERE deal_id = $1
        ORDER BY due_date ASC NULLS LAST, created_at ASC
        "#,
    )
    .bind(deal_id)
    .fetch_all(pool)
    .await
}

/// Find a deliverable, joining through deals to enforce ownership.
pub async fn find_by_id(
    pool: &PgPool,
    user_id: Uuid,
    deliverable_id: Uuid,
) -> Result<Option<Deliverable>, sqlx::Error> {
    sqlx::query_as::<_, Deliverable>(
        r#"
        SELECT d.id, d.deal_id, d.title, d.platform, d.due_date, d.status, d.created_at, d.updated_at
        FROM deliverables d
        JOIN deals ON deals.id = d.deal_id
        WHERE d.id = $1 AND deals.user_id = $2
        "#,
    )
    .bind(deliverable_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn update_status(
    pool: &PgPool,
    user_id: Uuid,
    deliverable_id: Uuid,
    status: DeliverableStatus,
) -> Result<Option<Deliverable>, sqlx::Error> {
    sqlx::query_as::<_, Deliverable>(
        r#"
        UPDATE deliverables d
        SET status = $1, updated_at = NOW()
        FROM deals
        WHERE d.id = $2 AND deals.id = d.deal_id AND deals.user_id = $3
        RETURNING d.id, d.deal_id, d.title, d.platform, d.due_date, d.status, d.created_at, d.updated_at
        "#,
    )
    .bind(status)
    .bind(deliverable_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(
    pool: &PgPool,
    user_id: Uuid,
    deliverable_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM deliverables d
        USING deals
        WHERE d.id = $1 AND deals.id = d.deal_id AND deals.user_id = $2
        "#,
    )
    .bind(deliverable_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Count deliverables still owed (not yet approved) across all of a user's deals
pub async fn count_outstanding_for_user(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM deliverables d
        JOIN deals ON deals.id = d.deal_id
        WHERE deals.user_id = $1 AND d.status <> 'approved'
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}
