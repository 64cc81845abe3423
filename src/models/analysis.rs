use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Named numeric indicators assembled for a symbol. Any subset may be
/// missing; absent metrics render as "N/A" in the recommendation prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisSnapshot {
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub ma_50: Option<f64>,
    pub ma_200: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    pub symbol: String,
}

/// Response of POST /api/analysis/technical.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalAnalysis {
    pub symbol: String,
    pub current_price: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub ma_50: Option<f64>,
    pub ma_200: Option<f64>,
    pub data_points: usize,
    pub as_of: DateTime<Utc>,
}

/// Response of POST /api/analysis/fundamental.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundamentalAnalysis {
    pub symbol: String,
    pub name: Option<String>,
    pub exchange: Option<String>,
    pub currency: Option<String>,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub as_of: DateTime<Utc>,
}
