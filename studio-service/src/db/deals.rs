use crate::models::{Deal, DealStage};
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

pub struct NewDeal<'a> {
    pub brand_id: Uuid,
    pub title: &'a str,
    pub stage: DealStage,
    pub amount: f64,
    pub currency: &'a str,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<&'a str>,
}

pub async fn create(pool: &PgPool, user_id: Uuid, deal: NewDeal<'_>) -> Result<Deal, sqlx::Error> {
    sqlx::query_as::<_, Deal>(
        r#"
        INSERT INTO deals (user_id, brand_id, title, stage, amount, currency, start_date, due_date, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, user_id, brand_id, title, stage, amount, currency, start_date, due_date,
                  notes, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(deal.brand_id)
    .bind(deal.title)
    .bind(deal.stage)
    .bind(deal.amount)
    .bind(deal.currency)
    .bind(deal.start_date)
    .bind(deal.due_date)
    .bind(deal.notes)
    .fetch_one(pool)
    .await
}

pub async fn list_by_user(
    pool: &PgPool,
    user_id: Uuid,
    stage: Option<DealStage>,
) -> Result<Vec<Deal>, sqlx::Error> {
    match stage {
        Some(stage) => {
            sqlx::query_as::<_, Deal>(
                r#"
                SELECT id, user_id, brand_id, title, stage, amount, currency, start_date, due_date,
                       notes, created_at, updated_at
                FROM deals
                WHERE user_id = $1 AND stage = $2
                ORDER BY updated_at DESC
                "#,
            )
            .bind(user_id)
            .bind(stage)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Deal>(
                r#"
                SELECT id, user_id, brand_id, title, stage, amount, currency, start_date, due_date,
                       notes, created_at, updated_at
                FROM deals
                WHERE user_id = $1
                ORDER BY updated_at DESC
                "#,
            )
            .bind(user_id)
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn find_by_id(
    pool: &PgPool,
    user_id: Uuid,
    deal_id: Uuid,
) -> Result<Option<Deal>, sqlx::Error> {
    sqlx::query_as::<_, Deal>(
        r#"
        SELECT id, user_id, brand_id, title, stage, amount, currency, start_date, due_date,
               notes, created_at, updated_at
        FROM deals
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(deal_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    user_id: Uuid,
    deal_id: Uuid,
    deal: NewDeal<'_>,
) -> Result<Option<Deal>, sqlx::Error> {
    sqlx::query_as::<_, Deal>(
        r#"
        UPDATE deals
        SET brand_id = $1, title = $2, stage = $3, amount = $4, currency = $5,
            start_date = $6, due_date = $7, notes = $8, updated_at = NOW()
        WHERE id = $9 AND user_id = $10
        RETURNING id, user_id, brand_id, title, stage, amount, currency, start_date, due_date,
                  notes, created_at, updated_at
        "#,
    )
    .bind(deal.brand_id)
    .bind(deal.title)
    .bind(deal.stage)
    .bind(deal.amount)
    .bind(deal.currency)
    .bind(deal.start_date)
    .bind(deal.due_date)
    .bind(deal.notes)
    .bind(deal_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Move a deal to a new pipeline stage
pub async fn update_stage(
    pool: &PgPool,
    user_id: Uuid,
    deal_id: Uuid,
    stage: DealStage,
) -> Result<Option<Deal>, sqlx::Error> {
    sqlx::query_as::<_, Deal>(
        r#"
        UPDATE deals
        SET stage = $1, updated_at = NOW()
        WHERE id = $2 AND user_id = $3
        RETURNING id, user_id, brand_id, title, stage, amount, currency, start_date, due_date,
                  notes, created_at, updated_at
        "#,
    )
    .bind(stage)
    .bind(deal_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, user_id: Uuid, deal_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM deals WHERE id = $1 AND user_id = $2")
        .bind(deal_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// All (stage, amount) pairs for a user, used by the dashboard aggregation
pub async fn stage_amounts(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<(DealStage, f64)>, sqlx::Error> {
    sqlx::query_as::<_, (DealStage, f64)>(
        "SELECT stage, amount FROM deals WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
