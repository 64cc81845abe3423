use async_trait::async_trait;
use thiserror::Error;

use crate::errors::AppError;
use crate::models::{PricePoint, Quote, StockInfo};

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("symbol not found")]
    NotFound,

    #[error("rate limited")]
    RateLimited,
}

impl From<MarketDataError> for AppError {
    fn from(value: MarketDataError) -> Self {
        match value {
            MarketDataError::NotFound => AppError::NotFound("Symbol not found".to_string()),
            MarketDataError::RateLimited => AppError::RateLimited,
            other => AppError::External(other.to_string()),
        }
    }
}

/// Seam to the market-data collaborator. One implementation per upstream
/// service; the rest of the system only sees this contract.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Latest traded price for a symbol.
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, MarketDataError>;

    /// Descriptive info for a symbol; fundamentals may be absent.
    async fn fetch_stock_info(&self, symbol: &str) -> Result<StockInfo, MarketDataError>;

    /// Daily closes, oldest first, trimmed to the latest `days` entries.
    async fn fetch_daily_history(
        &self,
        symbol: &str,
        days: u32,
    ) -> Result<Vec<PricePoint>, MarketDataError>;
}
