use sqlx::PgPool;
use uuid::Uuid;
use crate::models::{Portfolio, UpdatePortfolio};

const COLUMNS: &str = "id, name, portfolio_type, currency, initial_capital, \
                       notion_database_id, gsheet_id, is_active, created_at, updated_at";

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<Portfolio>, sqlx::Error> {
    sqlx::query_as::<_, Portfolio>(&format!(
        "SELECT {COLUMNS} FROM portfolios ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Option<Portfolio>, sqlx::Error> {
    sqlx::query_as::<_, Portfolio>(&format!(
        "SELECT {COLUMNS} FROM portfolios WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn insert(pool: &PgPool, input: Portfolio) -> Result<Portfolio, sqlx::Error> {
    sqlx::query_as::<_, Portfolio>(&format!(
        "INSERT INTO portfolios \
         (id, name, portfolio_type, currency, initial_capital, notion_database_id, gsheet_id, is_active, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING {COLUMNS}"
    ))
    .bind(input.id)
    .bind(input.name)
    .bind(input.portfolio_type)
    .bind(input.currency)
    .bind(input.initial_capital)
    .bind(input.notion_database_id)
    .bind(input.gsheet_id)
    .bind(input.is_active)
    .bind(input.created_at)
    .bind(input.updated_at)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: UpdatePortfolio,
) -> Result<Option<Portfolio>, sqlx::Error> {
    sqlx::query_as::<_, Portfolio>(&format!(
        "UPDATE portfolios \
         SET name = COALESCE($2, name), \
             is_active = COALESCE($3, is_active), \
             notion_database_id = COALESCE($4, notion_database_id), \
             gsheet_id = COALESCE($5, gsheet_id), \
             updated_at = NOW() \
         WHERE id = $1 \
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(input.name)
    .bind(input.is_active)
    .bind(input.notion_database_id)
    .bind(input.gsheet_id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM portfolios WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM portfolios WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
    Ok(exists.0)
}
