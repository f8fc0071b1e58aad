use crate::models::TeamMember;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create(
    pool: &PgPool,
    user_id: Uuid,
    name: &str,
    email: Option<&str>,
    role: &str,
) -> Result<TeamMember, sqlx::Error> {
    sqlx::query_as::<_, TeamMember>(
        r#"
        INSERT INTO team_members (user_id, name, email, role)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, name, email, role, created_at
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(email)
    .bind(role)
    .fetch_one(pool)
    .await
}

pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<TeamMember>, sqlx::Error> {
    sqlx::query_as::<_, TeamMember>(
        r#"
        SELECT id, user_id, name, email, role, created_at
        FROM team_members
        WHERE user_id = $1
        ORDER BY name ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn delete(pool: &PgPool, user_id: Uuid, member_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM team_members WHERE id = $1 AND user_id = $2")
        .bind(member_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
