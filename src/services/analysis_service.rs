use chrono::Utc;
use tracing::warn;

use crate::errors::AppError;
use crate::external::market_provider::MarketDataProvider;
use crate::models::{AnalysisSnapshot, FundamentalAnalysis, TechnicalAnalysis};
use crate::services::indicators;

// Enough trading days to warm up the 200-day moving average.
const HISTORY_DAYS: u32 = 260;

const RSI_PERIOD: usize = 14;
const MACD_FAST: usize = 12;
const MACD_SLOW: usize = 26;
const MACD_SIGNAL: usize = 9;

fn last_value(series: &[Option<f64>]) -> Option<f64> {
    series.last().copied().flatten()
}

pub async fn technical_analysis(
    provider: &dyn MarketDataProvider,
    symbol: &str,
) -> Result<TechnicalAnalysis, AppError> {
    let history = provider.fetch_daily_history(symbol, HISTORY_DAYS).await?;
    let closes: Vec<f64> = history.iter().map(|p| p.close).collect();

    let (macd_line, signal_line, histogram) =
        indicators::macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);

    Ok(TechnicalAnalysis {
        symbol: symbol.to_uppercase(),
        current_price: closes.last().copied(),
        rsi: last_value(&indicators::rsi(&closes, RSI_PERIOD)),
        macd: last_value(&macd_line),
        macd_signal: last_value(&signal_line),
        macd_histogram: last_value(&histogram),
        ma_50: last_value(&indicators::sma(&closes, 50)),
        ma_200: last_value(&indicators::sma(&closes, 200)),
        data_points: closes.len(),
        as_of: Utc::now(),
    })
}

pub async fn fundamental_analysis(
    provider: &dyn MarketDataProvider,
    symbol: &str,
) -> Result<FundamentalAnalysis, AppError> {
    let info = provider.fetch_stock_info(symbol).await?;

    Ok(FundamentalAnalysis {
        symbol: info.symbol,
        name: info.name,
        exchange: info.exchange,
        currency: info.currency,
        market_cap: info.market_cap,
        pe_ratio: info.pe_ratio,
        fifty_two_week_high: info.fifty_two_week_high,
        fifty_two_week_low: info.fifty_two_week_low,
        as_of: Utc::now(),
    })
}

/// Assemble the indicator bundle that feeds recommendation generation.
/// Partial data is acceptable: a failed lookup logs and leaves its fields
/// None, and they render as "N/A" in the prompt.
pub async fn build_snapshot(provider: &dyn MarketDataProvider, symbol: &str) -> AnalysisSnapshot {
    let mut snapshot = AnalysisSnapshot::default();

    match provider.fetch_daily_history(symbol, HISTORY_DAYS).await {
        Ok(history) => {
            let closes: Vec<f64> = history.iter().map(|p| p.close).collect();
            let (macd_line, _, _) = indicators::macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);

            snapshot.current_price = closes.last().copied();
            snapshot.rsi = last_value(&indicators::rsi(&closes, RSI_PERIOD));
            snapshot.macd = last_value(&macd_line);
            snapshot.ma_50 = last_value(&indicators::sma(&closes, 50));
            snapshot.ma_200 = last_value(&indicators::sma(&closes, 200));
        }
        Err(e) => warn!("No price history for {}: {}", symbol, e),
    }

    match provider.fetch_stock_info(symbol).await {
        Ok(info) => {
            snapshot.market_cap = info.market_cap;
            snapshot.pe_ratio = info.pe_ratio;
            if snapshot.current_price.is_none() {
                snapshot.current_price = info.current_price;
            }
        }
        Err(e) => warn!("No stock info for {}: {}", symbol, e),
    }

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::market_provider::MarketDataError;
    use crate::models::{PricePoint, Quote, StockInfo};
    use async_trait::async_trait;
    use chrono::NaiveDate;

    struct StubProvider {
        closes: Vec<f64>,
        info: Option<StockInfo>,
    }

    #[async_trait]
    impl MarketDataProvider for StubProvider {
        async fn fetch_quote(&self, _symbol: &str) -> Result<Quote, MarketDataError> {
            Err(MarketDataError::NotFound)
        }

        async fn fetch_stock_info(&self, _symbol: &str) -> Result<StockInfo, MarketDataError> {
            self.info.clone().ok_or(MarketDataError::NotFound)
        }

        async fn fetch_daily_history(
            &self,
            _symbol: &str,
            _days: u32,
        ) -> Result<Vec<PricePoint>, MarketDataError> {
            if self.closes.is_empty() {
                return Err(MarketDataError::NotFound);
            }
            let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
            Ok(self
                .closes
                .iter()
                .enumerate()
                .map(|(i, &close)| PricePoint {
                    date: start + chrono::Duration::days(i as i64),
                    close,
                })
                .collect())
        }
    }

    fn info(market_cap: Option<f64>, pe_ratio: Option<f64>) -> StockInfo {
        StockInfo {
            symbol: "AAPL".to_string(),
            name: Some("Apple Inc.".to_string()),
            exchange: Some("NMS".to_string()),
            currency: Some("USD".to_string()),
            current_price: Some(182.5),
            previous_close: Some(181.0),
            market_cap,
            pe_ratio,
            fifty_two_week_high: Some(199.6),
            fifty_two_week_low: Some(142.0),
        }
    }

    #[tokio::test]
    async fn snapshot_populates_indicators_from_history() {
        let provider = StubProvider {
            closes: (0..260).map(|i| 100.0 + i as f64 * 0.1).collect(),
            info: Some(info(Some(2.9e12), Some(28.4))),
        };

        let snapshot = build_snapshot(&provider, "AAPL").await;

        assert!(snapshot.current_price.is_some());
        assert!(snapshot.rsi.is_some());
        assert!(snapshot.macd.is_some());
        assert!(snapshot.ma_50.is_some());
        assert!(snapshot.ma_200.is_some());
        assert_eq!(snapshot.market_cap, Some(2.9e12));
        assert_eq!(snapshot.pe_ratio, Some(28.4));
    }

    #[tokio::test]
    async fn snapshot_tolerates_missing_history() {
        let provider = StubProvider {
            closes: Vec::new(),
            info: Some(info(None, None)),
        };

        let snapshot = build_snapshot(&provider, "AAPL").await;

        assert!(snapshot.rsi.is_none());
        assert!(snapshot.ma_200.is_none());
        // Price falls back to the info quote.
        assert_eq!(snapshot.current_price, Some(182.5));
    }

    #[tokio::test]
    async fn snapshot_tolerates_total_provider_failure() {
        let provider = StubProvider {
            closes: Vec::new(),
            info: None,
        };

        let snapshot = build_snapshot(&provider, "AAPL").await;

        assert!(snapshot.current_price.is_none());
        assert!(snapshot.market_cap.is_none());
    }

    #[tokio::test]
    async fn technical_analysis_short_history_leaves_long_ma_empty() {
        let provider = StubProvider {
            closes: (0..60).map(|i| 100.0 + i as f64).collect(),
            info: None,
        };

        let analysis = technical_analysis(&provider, "aapl").await.unwrap();

        assert_eq!(analysis.symbol, "AAPL");
        assert_eq!(analysis.data_points, 60);
        assert!(analysis.ma_50.is_some());
        assert!(analysis.ma_200.is_none());
    }
}
