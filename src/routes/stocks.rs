use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{HistoryQuery, PriceHistory, Quote, StockInfo};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:symbol", get(get_stock))
        .route("/:symbol/price", get(get_stock_price))
        .route("/:symbol/history", get(get_stock_history))
}

pub async fn get_stock(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<StockInfo>, AppError> {
    info!("GET /stocks/{} - Fetching stock info", symbol);
    let info = services::market_data_service::get_stock_info(state.market_data.as_ref(), &symbol)
        .await
        .map_err(|e| {
            error!("Failed to fetch stock info for {}: {}", symbol, e);
            e
        })?;
    Ok(Json(info))
}

pub async fn get_stock_price(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Quote>, AppError> {
    info!("GET /stocks/{}/price - Fetching quote", symbol);
    let quote = services::market_data_service::get_quote(state.market_data.as_ref(), &symbol)
        .await
        .map_err(|e| {
            error!("Failed to fetch quote for {}: {}", symbol, e);
            e
        })?;
    Ok(Json(quote))
}

pub async fn get_stock_history(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<PriceHistory>, AppError> {
    info!("GET /stocks/{}/history - days={:?}", symbol, query.days);
    let history = services::market_data_service::get_history(
        state.market_data.as_ref(),
        &symbol,
        query.days,
    )
    .await
    .map_err(|e| {
        error!("Failed to fetch history for {}: {}", symbol, e);
        e
    })?;
    Ok(Json(history))
}
