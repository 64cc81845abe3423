use bigdecimal::{BigDecimal, Zero};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::models::{CreateOrder, Order};

const SIDES: [&str; 2] = ["buy", "sell"];

pub async fn create(pool: &PgPool, input: CreateOrder) -> Result<Order, AppError> {
    if input.symbol.trim().is_empty() {
        return Err(AppError::Validation("Symbol cannot be empty".into()));
    }
    if !SIDES.contains(&input.side.as_str()) {
        return Err(AppError::Validation("side must be 'buy' or 'sell'".into()));
    }
    if input.quantity <= BigDecimal::zero() {
        return Err(AppError::Validation("Quantity must be > 0".into()));
    }
    if input.price <= BigDecimal::zero() {
        return Err(AppError::Validation("Price must be > 0".into()));
    }
    if let Some(fees) = &input.fees {
        if fees < &BigDecimal::zero() {
            return Err(AppError::Validation("Fees cannot be negative".into()));
        }
    }

    if !db::portfolio_queries::exists(pool, input.portfolio_id).await? {
        return Err(AppError::NotFound("Portfolio not found".to_string()));
    }

    let order = db::order_queries::insert(pool, Order::new(input)).await?;
    Ok(order)
}

pub async fn list(pool: &PgPool, portfolio_id: Option<Uuid>) -> Result<Vec<Order>, AppError> {
    let orders = db::order_queries::fetch_all(pool, portfolio_id).await?;
    Ok(orders)
}

pub(crate) async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Order, AppError> {
    db::order_queries::fetch_one(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
}
