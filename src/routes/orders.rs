use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{CreateOrder, Order};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order).get(fetch_orders))
        .route("/:id", get(get_order))
}

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub portfolio_id: Option<Uuid>,
}

#[axum::debug_handler]
pub async fn create_order(
    State(state): State<AppState>,
    Json(data): Json<CreateOrder>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    info!("POST /orders - Recording {} order for {}", data.side, data.symbol);
    let order = services::order_service::create(&state.pool, data)
        .await
        .map_err(|e| {
            error!("Failed to record order: {}", e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn fetch_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<Order>>, AppError> {
    info!("GET /orders - Fetching orders (portfolio: {:?})", query.portfolio_id);
    let orders = services::order_service::list(&state.pool, query.portfolio_id)
        .await
        .map_err(|e| {
            error!("Failed to fetch orders: {}", e);
            e
        })?;
    Ok(Json(orders))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    info!("GET /orders/{} - Fetching order", id);
    let order = services::order_service::fetch_one(&state.pool, id)
        .await
        .map_err(|e| {
            error!("Failed to fetch order {}: {}", id, e);
            e
        })?;
    Ok(Json(order))
}
