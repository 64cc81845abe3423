use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::external::market_provider::{MarketDataError, MarketDataProvider};
use crate::models::{PricePoint, Quote, StockInfo};

/// Yahoo Finance chart API provider. Free, no API key required; the chart
/// meta block carries enough for quotes and basic stock info, while
/// fundamentals (market cap, P/E) are not exposed and stay None.
pub struct YahooFinanceProvider {
    client: reqwest::Client,
}

impl YahooFinanceProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (compatible; Croesus/0.1)")
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    async fn fetch_chart(
        &self,
        symbol: &str,
        range: &str,
    ) -> Result<YahooResult, MarketDataError> {
        let url = format!("https://query1.finance.yahoo.com/v8/finance/chart/{}", symbol);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("interval", "1d"),
                ("range", range),
                ("includeAdjustedClose", "true"),
            ])
            .send()
            .await
            .map_err(|e| MarketDataError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            if status == 404 {
                return Err(MarketDataError::NotFound);
            }
            if status == 429 {
                return Err(MarketDataError::RateLimited);
            }
            return Err(MarketDataError::BadResponse(format!("HTTP {}", status)));
        }

        let body: YahooChartResponse = resp
            .json()
            .await
            .map_err(|e| MarketDataError::Parse(e.to_string()))?;

        if let Some(error) = body.chart.error {
            if error.description.contains("No data found") {
                return Err(MarketDataError::NotFound);
            }
            return Err(MarketDataError::BadResponse(error.description));
        }

        body.chart
            .result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
            .ok_or_else(|| MarketDataError::BadResponse("No results in response".into()))
    }
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    meta: YahooMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooMeta {
    symbol: String,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    exchange_name: Option<String>,
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    long_name: Option<String>,
    #[serde(default)]
    regular_market_price: Option<f64>,
    #[serde(default)]
    chart_previous_close: Option<f64>,
    #[serde(default)]
    regular_market_time: Option<i64>,
    #[serde(default)]
    fifty_two_week_high: Option<f64>,
    #[serde(default)]
    fifty_two_week_low: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuoteBars>,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteBars {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

fn range_for_days(days: u32) -> &'static str {
    if days <= 5 {
        "5d"
    } else if days <= 30 {
        "1mo"
    } else if days <= 90 {
        "3mo"
    } else if days <= 180 {
        "6mo"
    } else if days <= 365 {
        "1y"
    } else if days <= 730 {
        "2y"
    } else {
        "5y"
    }
}

fn last_some<T: Copy>(values: &[Option<T>]) -> Option<T> {
    values.iter().rev().find_map(|v| *v)
}

#[async_trait]
impl MarketDataProvider for YahooFinanceProvider {
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let result = self.fetch_chart(symbol, "1d").await?;
        let bars = result
            .indicators
            .quote
            .first()
            .ok_or_else(|| MarketDataError::BadResponse("No quote data in response".into()))?;

        let price = result
            .meta
            .regular_market_price
            .or_else(|| last_some(&bars.close))
            .ok_or(MarketDataError::NotFound)?;

        let timestamp = result
            .meta
            .regular_market_time
            .and_then(|t| DateTime::from_timestamp(t, 0))
            .unwrap_or_else(Utc::now);

        Ok(Quote {
            symbol: result.meta.symbol,
            price,
            open: last_some(&bars.open),
            high: last_some(&bars.high),
            low: last_some(&bars.low),
            volume: last_some(&bars.volume),
            timestamp,
        })
    }

    async fn fetch_stock_info(&self, symbol: &str) -> Result<StockInfo, MarketDataError> {
        let result = self.fetch_chart(symbol, "1y").await?;
        let meta = result.meta;

        Ok(StockInfo {
            symbol: meta.symbol,
            name: meta.long_name.or(meta.short_name),
            exchange: meta.exchange_name,
            currency: meta.currency,
            current_price: meta.regular_market_price,
            previous_close: meta.chart_previous_close,
            // Not exposed by the chart API.
            market_cap: None,
            pe_ratio: None,
            fifty_two_week_high: meta.fifty_two_week_high,
            fifty_two_week_low: meta.fifty_two_week_low,
        })
    }

    async fn fetch_daily_history(
        &self,
        symbol: &str,
        days: u32,
    ) -> Result<Vec<PricePoint>, MarketDataError> {
        let result = self.fetch_chart(symbol, range_for_days(days)).await?;

        let bars = result
            .indicators
            .quote
            .first()
            .ok_or_else(|| MarketDataError::BadResponse("No quote data in response".into()))?;

        if result.timestamp.len() != bars.close.len() {
            return Err(MarketDataError::Parse(
                "Timestamp and close price arrays have different lengths".into(),
            ));
        }

        let mut points: Vec<PricePoint> = result
            .timestamp
            .iter()
            .zip(bars.close.iter())
            .filter_map(|(timestamp, close_opt)| {
                // Skip null closes (market holidays, halted sessions).
                let close = (*close_opt)?;
                let date = DateTime::from_timestamp(*timestamp, 0).map(|dt| dt.date_naive())?;
                Some(PricePoint { date, close })
            })
            .collect();

        points.sort_by(|a, b| a.date.cmp(&b.date));

        if points.is_empty() {
            return Err(MarketDataError::NotFound);
        }

        // The range buckets over-fetch; keep only the latest N requested days.
        if days > 0 && points.len() > days as usize {
            points.drain(..points.len() - days as usize);
        }

        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_buckets_cover_requested_days() {
        assert_eq!(range_for_days(5), "5d");
        assert_eq!(range_for_days(30), "1mo");
        assert_eq!(range_for_days(200), "1y");
        assert_eq!(range_for_days(260), "1y");
        assert_eq!(range_for_days(1000), "5y");
    }

    #[test]
    fn last_some_skips_trailing_nulls() {
        let values = vec![Some(1.0), Some(2.0), None];
        assert_eq!(last_some(&values), Some(2.0));
        let empty: Vec<Option<f64>> = vec![None, None];
        assert_eq!(last_some(&empty), None);
    }
}
