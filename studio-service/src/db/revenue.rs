use crate::models::RevenueEntry;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

pub struct NewRevenueEntry<'a> {
    pub deal_id: Option<Uuid>,
    pub amount: f64,
    pub currency: &'a str,
    pub source: Option<&'a str>,
    pub entry_date: NaiveDate,
    pub notes: Option<&'a str>,
}

pub async fn create(
    pool: &PgPool,
    user_id: Uuid,
    entry: NewRevenueEntry<'_>,
) -> Result<RevenueEntry, sqlx::Error> {
    sqlx::query_as::<_, RevenueEntry>(
        r#"
        INSERT INTO revenue_entries (user_id, deal_id, amount, currency, source, entry_date, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, user_id, deal_id, amount, currency, source, entry_date, notes, created_at
        "#,
    )
    .bind(user_id)
    .bind(entry.deal_id)
    .bind(entry.amount)
    .bind(entry.currency)
    .bind(entry.source)
    .bind(entry.entry_date)
    .bind(entry.notes)
    .fetch_one(pool)
    .await
}

pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<RevenueEntry>, sqlx::Error> {
    sqlx::query_as::<_, RevenueEntry>(
        r#"
        SELECT id, user_id, deal_id, amount, currency, source, entry_date, notes, created_at
        FROM revenue_entries
        WHERE user_id = $1
        ORDER BY entry_date DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn delete(pool: &PgPool, user_id: Uuid, entry_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM revenue_entries WHERE id = $1 AND user_id = $2")
        .bind(entry_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
