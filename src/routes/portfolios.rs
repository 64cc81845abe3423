use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    CreatePortfolio, CreatePosition, Portfolio, PortfolioPerformance, Position, UpdatePortfolio,
};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_portfolio).get(fetch_portfolios))
        .route("/:id", get(get_portfolio))
        .route("/:id", put(update_portfolio))
        .route("/:id", delete(delete_portfolio))
        .route("/:id/performance", get(get_performance))
        .route("/:id/positions", post(create_position).get(fetch_positions))
        .route("/:id/positions/refresh", post(refresh_positions))
}

#[axum::debug_handler]
pub async fn create_portfolio(
    State(state): State<AppState>,
    Json(data): Json<CreatePortfolio>,
) -> Result<(StatusCode, Json<Portfolio>), AppError> {
    info!("POST /portfolios - Creating new portfolio");
    let portfolio = services::portfolio_service::create(&state.pool, data)
        .await
        .map_err(|e| {
            error!("Failed to create portfolio: {}", e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(portfolio)))
}

pub async fn fetch_portfolios(
    State(state): State<AppState>,
) -> Result<Json<Vec<Portfolio>>, AppError> {
    info!("GET /portfolios - Fetching all portfolios");
    let portfolios = services::portfolio_service::fetch_all(&state.pool)
        .await
        .map_err(|e| {
            error!("Failed to fetch portfolios: {}", e);
            e
        })?;
    Ok(Json(portfolios))
}

pub async fn get_portfolio(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Portfolio>, AppError> {
    info!("GET /portfolios/{} - Fetching portfolio", id);
    let portfolio = services::portfolio_service::fetch_one(&state.pool, id)
        .await
        .map_err(|e| {
            error!("Failed to fetch portfolio {}: {}", id, e);
            e
        })?;
    Ok(Json(portfolio))
}

pub async fn update_portfolio(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdatePortfolio>,
) -> Result<Json<Portfolio>, AppError> {
    info!("PUT /portfolios/{} - Updating portfolio", id);
    let portfolio = services::portfolio_service::update(&state.pool, id, data)
        .await
        .map_err(|e| {
            error!("Failed to update portfolio {}: {}", id, e);
            e
        })?;
    Ok(Json(portfolio))
}

pub async fn delete_portfolio(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /portfolios/{} - Deleting portfolio", id);
    services::portfolio_service::delete(&state.pool, id)
        .await
        .map_err(|e| {
            error!("Failed to delete portfolio {}: {}", id, e);
            e
        })?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/portfolios/:id/performance
///
/// Rolls current positions up into total market value, cost basis,
/// unrealized P&L and percentage return. Computed fresh on every call.
pub async fn get_performance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PortfolioPerformance>, AppError> {
    info!("GET /portfolios/{}/performance - Calculating performance", id);
    let performance = services::portfolio_service::calculate_performance(&state.pool, id)
        .await
        .map_err(|e| {
            error!("Failed to calculate performance for {}: {}", id, e);
            e
        })?;
    Ok(Json(performance))
}

pub async fn create_position(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<CreatePosition>,
) -> Result<(StatusCode, Json<Position>), AppError> {
    info!("POST /portfolios/{}/positions - Creating position", id);
    let position = services::position_service::create(&state.pool, id, data)
        .await
        .map_err(|e| {
            error!("Failed to create position in portfolio {}: {}", id, e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(position)))
}

pub async fn fetch_positions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Position>>, AppError> {
    info!("GET /portfolios/{}/positions - Fetching positions", id);
    let positions = services::position_service::list(&state.pool, id)
        .await
        .map_err(|e| {
            error!("Failed to fetch positions for portfolio {}: {}", id, e);
            e
        })?;
    Ok(Json(positions))
}

/// POST /api/portfolios/:id/positions/refresh
///
/// Re-quotes every position and writes fresh market values and unrealized
/// P&L back. Symbols that fail to quote keep their previous valuation.
pub async fn refresh_positions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Position>>, AppError> {
    info!("POST /portfolios/{}/positions/refresh - Refreshing valuations", id);
    let positions = services::position_service::refresh_valuations(
        &state.pool,
        state.market_data.as_ref(),
        id,
    )
    .await
    .map_err(|e| {
        error!("Failed to refresh positions for portfolio {}: {}", id, e);
        e
    })?;
    Ok(Json(positions))
}
