use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{AnalysisRequest, FundamentalAnalysis, TechnicalAnalysis};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/technical", post(technical_analysis))
        .route("/fundamental", post(fundamental_analysis))
}

/// POST /api/analysis/technical
///
/// Computes RSI, MACD and moving averages from daily price history.
#[axum::debug_handler]
pub async fn technical_analysis(
    State(state): State<AppState>,
    Json(req): Json<AnalysisRequest>,
) -> Result<Json<TechnicalAnalysis>, AppError> {
    info!("POST /analysis/technical - symbol={}", req.symbol);
    validate_symbol(&req.symbol)?;

    let analysis =
        services::analysis_service::technical_analysis(state.market_data.as_ref(), &req.symbol)
            .await
            .map_err(|e| {
                error!("Technical analysis failed for {}: {}", req.symbol, e);
                e
            })?;
    Ok(Json(analysis))
}

/// POST /api/analysis/fundamental
///
/// Returns the valuation fundamentals the market-data provider exposes.
#[axum::debug_handler]
pub async fn fundamental_analysis(
    State(state): State<AppState>,
    Json(req): Json<AnalysisRequest>,
) -> Result<Json<FundamentalAnalysis>, AppError> {
    info!("POST /analysis/fundamental - symbol={}", req.symbol);
    validate_symbol(&req.symbol)?;

    let analysis =
        services::analysis_service::fundamental_analysis(state.market_data.as_ref(), &req.symbol)
            .await
            .map_err(|e| {
                error!("Fundamental analysis failed for {}: {}", req.symbol, e);
                e
            })?;
    Ok(Json(analysis))
}

fn validate_symbol(symbol: &str) -> Result<(), AppError> {
    if symbol.trim().is_empty() || symbol.len() > 10 {
        return Err(AppError::Validation(
            "Invalid symbol. Must be 1-10 characters.".to_string(),
        ));
    }
    Ok(())
}
