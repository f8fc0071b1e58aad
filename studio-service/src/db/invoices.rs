use crate::models::{Invoice, InvoiceStatus};
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

pub struct NewInvoice<'a> {
    pub deal_id: Option<Uuid>,
    pub invoice_number: &'a str,
    pub amount: f64,
    pub currency: &'a str,
    pub issued_at: Option<NaiveDate>,
    pub due_at: Option<NaiveDate>,
}

pub async fn create(
    pool: &PgPool,
    user_id: Uuid,
    invoice: NewInvoice<'_>,
) -> Result<Invoice, sqlx::Error> {
    sqlx::query_as::<_, Invoice>(
        r#"
        INSERT INTO invoices (user_id, deal_id, invoice_number, amount, currency, issued_at, due_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, user_id, deal_id, invoice_number, amount, currency, status,
                  issued_at, due_at, paid_at, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(invoice.deal_id)
    .bind(invoice.invoice_number)
    .bind(invoice.amount)
    .bind(invoice.currency)
    .bind(invoice.issued_at)
    .bind(invoice.due_at)
    .fetch_one(pool)
    .await
}

pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Invoice>, sqlx::Error> {
    sqlx::query_as::<_, Invoice>(
        r#"
        SELECT id, user_id, deal_id, invoice_number, amount, currency, status,
               issued_at, due_at, paid_at, created_at, updated_at
        FROM invoices
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(
    pool: &PgPool,
    user_id: Uuid,
    invoice_id: Uuid,
) -> Result<Option<Invoice>, sqlx::Error> {
    sqlx::query_as::<_, Invoice>(
        r#"
        SELECT id, user_id, deal_id, invoice_number, amount, currency, status,
               issued_at, due_at, paid_at, created_at, updated_at
        FROM invoices
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(invoice_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Update invoice status; paid_at is stamped when moving to paid and cleared
/// otherwise.
pub async fn update_status(
    pool: &PgPool,
    user_id: Uuid,
    invoice_id: Uuid,
    status: InvoiceStatus,
) -> Result<Option<Invoice>, sqlx::Error> {
    sqlx::query_as::<_, Invoice>(
        r#"
        UPDATE invoices
        SET status = $1,
            paid_at = CASE WHEN $1 = 'paid'::invoice_status THEN CURRENT_DATE ELSE NULL END,
            updated_at = NOW()
        WHERE id = $2 AND user_id = $3
        RETURNING id, user_id, deal_id, invoice_number, amount, currency, status,
                  issued_at, due_at, paid_at, created_at, updated_at
        "#,
    )
    .bind(status)
    .bind(invoice_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, user_id: Uuid, invoice_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM invoices WHERE id = $1 AND user_id = $2")
        .bind(invoice_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Sum of invoices not yet paid, used by the dashboard
pub async fn unpaid_total(pool: &PgPool, user_id: Uuid) -> Result<f64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(amount), 0)
        FROM invoices
        WHERE user_id = $1 AND status IN ('sent', 'overdue')
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}
