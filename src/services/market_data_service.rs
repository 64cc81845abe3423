use crate::errors::AppError;
use crate::external::market_provider::MarketDataProvider;
use crate::models::{PriceHistory, Quote, StockInfo};

const DEFAULT_HISTORY_DAYS: u32 = 30;
const MAX_HISTORY_DAYS: u32 = 1825;

pub async fn get_stock_info(
    provider: &dyn MarketDataProvider,
    symbol: &str,
) -> Result<StockInfo, AppError> {
    let info = provider.fetch_stock_info(&symbol.to_uppercase()).await?;
    Ok(info)
}

pub async fn get_quote(
    provider: &dyn MarketDataProvider,
    symbol: &str,
) -> Result<Quote, AppError> {
    let quote = provider.fetch_quote(&symbol.to_uppercase()).await?;
    Ok(quote)
}

pub async fn get_history(
    provider: &dyn MarketDataProvider,
    symbol: &str,
    days: Option<u32>,
) -> Result<PriceHistory, AppError> {
    let days = days.unwrap_or(DEFAULT_HISTORY_DAYS);
    if days == 0 || days > MAX_HISTORY_DAYS {
        return Err(AppError::Validation(format!(
            "days must be between 1 and {}",
            MAX_HISTORY_DAYS
        )));
    }

    let symbol = symbol.to_uppercase();
    let data = provider.fetch_daily_history(&symbol, days).await?;
    let total_records = data.len();

    Ok(PriceHistory {
        symbol,
        days,
        data,
        total_records,
    })
}
