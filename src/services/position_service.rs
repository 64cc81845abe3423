use bigdecimal::{BigDecimal, FromPrimitive, Zero};
use sqlx::PgPool;
use tracing::{error, warn};
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::external::market_provider::MarketDataProvider;
use crate::models::{CreatePosition, Position, UpdatePosition};

pub async fn create(
    pool: &PgPool,
    portfolio_id: Uuid,
    input: CreatePosition,
) -> Result<Position, AppError> {
    if input.symbol.trim().is_empty() {
        return Err(AppError::Validation("Symbol cannot be empty".into()));
    }
    if input.quantity < BigDecimal::zero() {
        return Err(AppError::Validation("Quantity cannot be negative".into()));
    }
    if let Some(average_cost) = &input.average_cost {
        if average_cost < &BigDecimal::zero() {
            return Err(AppError::Validation("Average cost cannot be negative".into()));
        }
    }

    if !db::portfolio_queries::exists(pool, portfolio_id).await? {
        return Err(AppError::NotFound("Portfolio not found".to_string()));
    }

    match db::position_queries::insert(pool, Position::new(portfolio_id, input)).await {
        Ok(position) => Ok(position),
        Err(e) => {
            error!("Failed to create position for portfolio {}: {:?}", portfolio_id, e);
            Err(AppError::Db(e))
        }
    }
}

pub async fn list(pool: &PgPool, portfolio_id: Uuid) -> Result<Vec<Position>, AppError> {
    if !db::portfolio_queries::exists(pool, portfolio_id).await? {
        return Err(AppError::NotFound("Portfolio not found".to_string()));
    }
    let positions = db::position_queries::fetch_all(pool, portfolio_id).await?;
    Ok(positions)
}

pub(crate) async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Position, AppError> {
    db::position_queries::fetch_one(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Position not found".to_string()))
}

pub async fn update(pool: &PgPool, id: Uuid, input: UpdatePosition) -> Result<Position, AppError> {
    if let Some(quantity) = &input.quantity {
        if quantity < &BigDecimal::zero() {
            return Err(AppError::Validation("Quantity cannot be negative".into()));
        }
    }
    if let Some(average_cost) = &input.average_cost {
        if average_cost < &BigDecimal::zero() {
            return Err(AppError::Validation("Average cost cannot be negative".into()));
        }
    }

    db::position_queries::update(pool, id, input)
        .await?
        .ok_or_else(|| AppError::NotFound("Position not found".to_string()))
}

pub(crate) async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, AppError> {
    match db::position_queries::delete(pool, id).await {
        Ok(0) => Err(AppError::NotFound("Position not found".to_string())),
        Ok(n) => Ok(n),
        Err(e) => Err(AppError::from(e)),
    }
}

/// Re-quote every position in a portfolio and write fresh valuations back.
/// Per-symbol failures are absorbed: the position keeps its previous values
/// and the rest of the portfolio still refreshes.
pub async fn refresh_valuations(
    pool: &PgPool,
    provider: &dyn MarketDataProvider,
    portfolio_id: Uuid,
) -> Result<Vec<Position>, AppError> {
    let positions = list(pool, portfolio_id).await?;

    let quotes = futures::future::join_all(
        positions
            .iter()
            .map(|position| provider.fetch_quote(&position.symbol)),
    )
    .await;

    let mut refreshed = Vec::with_capacity(positions.len());

    for (position, quote) in positions.into_iter().zip(quotes) {
        let quote = match quote {
            Ok(q) => q,
            Err(e) => {
                warn!("No quote for {}; keeping stale valuation: {}", position.symbol, e);
                refreshed.push(position);
                continue;
            }
        };

        let Some(price) = BigDecimal::from_f64(quote.price) else {
            warn!("Unusable quote price for {}: {}", position.symbol, quote.price);
            refreshed.push(position);
            continue;
        };

        let market_value = &price * &position.quantity;
        let cost = position
            .average_cost
            .as_ref()
            .map(|avg| avg * &position.quantity);
        let unrealized_pnl = cost.as_ref().map(|c| &market_value - c);
        let unrealized_pnl_percent = match (&unrealized_pnl, &cost) {
            (Some(pnl), Some(c)) if c > &BigDecimal::zero() => {
                Some(pnl / c * BigDecimal::from(100))
            }
            _ => None,
        };

        let updated = db::position_queries::update_valuation(
            pool,
            position.id,
            price,
            market_value,
            unrealized_pnl,
            unrealized_pnl_percent,
        )
        .await?
        .unwrap_or(position);

        refreshed.push(updated);
    }

    Ok(refreshed)
}
