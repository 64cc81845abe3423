use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::models::{CreatePortfolio, Portfolio, PortfolioPerformance, UpdatePortfolio};
use crate::services::performance;

const PORTFOLIO_TYPES: [&str; 2] = ["real", "virtual"];

pub async fn create(pool: &PgPool, input: CreatePortfolio) -> Result<Portfolio, AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Portfolio name cannot be empty".into()));
    }
    if !PORTFOLIO_TYPES.contains(&input.portfolio_type.as_str()) {
        return Err(AppError::Validation(
            "portfolio_type must be 'real' or 'virtual'".into(),
        ));
    }
    if input.currency.len() != 3 {
        return Err(AppError::Validation(
            "currency must be a 3-letter code".into(),
        ));
    }

    let portfolio = db::portfolio_queries::insert(pool, Portfolio::new(input)).await?;
    Ok(portfolio)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: UpdatePortfolio,
) -> Result<Portfolio, AppError> {
    if let Some(name) = &input.name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("Portfolio name cannot be empty".into()));
        }
    }

    let portfolio = db::portfolio_queries::update(pool, id, input)
        .await?
        .ok_or_else(|| AppError::NotFound("Portfolio not found".to_string()))?;
    Ok(portfolio)
}

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<Portfolio>, AppError> {
    let portfolios = db::portfolio_queries::fetch_all(pool).await?;
    Ok(portfolios)
}

pub(crate) async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Portfolio, AppError> {
    let portfolio = db::portfolio_queries::fetch_one(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Portfolio not found".to_string()))?;
    Ok(portfolio)
}

pub(crate) async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, AppError> {
    match db::portfolio_queries::delete(pool, id).await {
        Ok(0) => Err(AppError::NotFound("Portfolio not found".to_string())),
        Ok(n) => Ok(n),
        Err(e) => Err(AppError::from(e)),
    }
}

/// Roll up current positions into performance metrics. Always derived fresh
/// from the live position snapshot; nothing is persisted.
pub async fn calculate_performance(
    pool: &PgPool,
    id: Uuid,
) -> Result<PortfolioPerformance, AppError> {
    if !db::portfolio_queries::exists(pool, id).await? {
        return Err(AppError::NotFound("Portfolio not found".to_string()));
    }

    let positions = db::position_queries::fetch_all(pool, id).await?;
    let summary = performance::compute_performance(&positions);

    Ok(PortfolioPerformance {
        portfolio_id: id,
        summary,
    })
}
