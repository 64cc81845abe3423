use bigdecimal::BigDecimal;
use sqlx::PgPool;
use uuid::Uuid;
use crate::models::{Position, UpdatePosition};

const COLUMNS: &str = "id, portfolio_id, symbol, quantity, average_cost, current_price, \
                       market_value, unrealized_pnl, unrealized_pnl_percent, last_updated, created_at";

pub async fn insert(pool: &PgPool, input: Position) -> Result<Position, sqlx::Error> {
    sqlx::query_as::<_, Position>(&format!(
        "INSERT INTO positions \
         (id, portfolio_id, symbol, quantity, average_cost, last_updated, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {COLUMNS}"
    ))
    .bind(input.id)
    .bind(input.portfolio_id)
    .bind(input.symbol)
    .bind(input.quantity)
    .bind(input.average_cost)
    .bind(input.last_updated)
    .bind(input.created_at)
    .fetch_one(pool)
    .await
}

pub async fn fetch_all(pool: &PgPool, portfolio_id: Uuid) -> Result<Vec<Position>, sqlx::Error> {
    sqlx::query_as::<_, Position>(&format!(
        "SELECT {COLUMNS} FROM positions WHERE portfolio_id = $1 ORDER BY created_at DESC"
    ))
    .bind(portfolio_id)
    .fetch_all(pool)
    .await
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Option<Position>, sqlx::Error> {
    sqlx::query_as::<_, Position>(&format!(
        "SELECT {COLUMNS} FROM positions WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: UpdatePosition,
) -> Result<Option<Position>, sqlx::Error> {
    sqlx::query_as::<_, Position>(&format!(
        "UPDATE positions \
         SET quantity = COALESCE($2, quantity), \
             average_cost = COALESCE($3, average_cost), \
             last_updated = NOW() \
         WHERE id = $1 \
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(input.quantity)
    .bind(input.average_cost)
    .fetch_optional(pool)
    .await
}

/// Write back a freshly fetched valuation for one position.
pub async fn update_valuation(
    pool: &PgPool,
    id: Uuid,
    current_price: BigDecimal,
    market_value: BigDecimal,
    unrealized_pnl: Option<BigDecimal>,
    unrealized_pnl_percent: Option<BigDecimal>,
) -> Result<Option<Position>, sqlx::Error> {
    sqlx::query_as::<_, Position>(&format!(
        "UPDATE positions \
         SET current_price = $2, \
             market_value = $3, \
             unrealized_pnl = $4, \
             unrealized_pnl_percent = $5, \
             last_updated = NOW() \
         WHERE id = $1 \
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(current_price)
    .bind(market_value)
    .bind(unrealized_pnl)
    .bind(unrealized_pnl_percent)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM positions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
