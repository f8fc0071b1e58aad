use crate::models::Brand;
use sqlx::PgPool;
use uuid::Uuid;

pub struct NewBrand<'a> {
    pub name: &'a str,
    pub website: Option<&'a str>,
    pub industry: Option<&'a str>,
    pub contact_name: Option<&'a str>,
    pub contact_email: Option<&'a str>,
    pub notes: Option<&'a str>,
}

pub async fn create(pool: &PgPool, user_id: Uuid, brand: NewBrand<'_>) -> Result<Brand, sqlx::Error> {
    sqlx::query_as::<_, Brand>(
        r#"
        INSERT INTO brands (user_id, name, website, industry, contact_name, contact_email, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, user_id, name, website, industry, contact_name, contact_email, notes,
                  created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(brand.name)
    .bind(brand.website)
    .bind(brand.industry)
    .bind(brand.contact_name)
    .bind(brand.contact_email)
    .bind(brand.notes)
    .fetch_one(pool)
    .await
}

pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Brand>, sqlx::Error> {
    sqlx::query_as::<_, Brand>(
        r#"
        SELECT id, user_id, name, website, industry, contact_name, contact_email, notes,
               created_at, updated_at
        FROM brands
        WHERE user_id = $1
        ORDER BY name ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(
    pool: &PgPool,
    user_id: Uuid,
    brand_id: Uuid,
) -> Result<Option<Brand>, sqlx::Error> {
    sqlx::query_as::<_, Brand>(
        r#"
        SELECT id, user_id, name, website, industry, contact_name, contact_email, notes,
               created_at, updated_at
        FROM brands
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(brand_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    user_id: Uuid,
    brand_id: Uuid,
    brand: NewBrand<'_>,
) -> Result<Option<Brand>, sqlx::Error> {
    sqlx::query_as::<_, Brand>(
        r#"
        UPDATE brands
        SET name = $1, website = $2, industry = $3, contact_name = $4,
            contact_email = $5, notes = $6, updated_at = NOW()
        WHERE id = $7 AND user_id = $8
        RETURNING id, user_id, name, website, industry, contact_name, contact_email, notes,
                  created_at, updated_at
        "#,
    )
    .bind(brand.name)
    .bind(brand.website)
    .bind(brand.industry)
    .bind(brand.contact_name)
    .bind(brand.contact_email)
    .bind(brand.notes)
    .bind(brand_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, user_id: Uuid, brand_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM brands WHERE id = $1 AND user_id = $2")
        .bind(brand_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
