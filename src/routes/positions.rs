use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Position, UpdatePosition};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:id", get(get_position))
        .route("/:id", put(update_position))
        .route("/:id", delete(delete_position))
}

pub async fn get_position(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Position>, AppError> {
    info!("GET /positions/{} - Fetching position", id);
    let position = services::position_service::fetch_one(&state.pool, id)
        .await
        .map_err(|e| {
            error!("Failed to fetch position {}: {}", id, e);
            e
        })?;
    Ok(Json(position))
}

pub async fn update_position(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdatePosition>,
) -> Result<Json<Position>, AppError> {
    info!("PUT /positions/{} - Updating position", id);
    let updated = services::position_service::update(&state.pool, id, input)
        .await
        .map_err(|e| {
            error!("Failed to update position {}: {}", id, e);
            e
        })?;
    Ok(Json(updated))
}

pub async fn delete_position(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /positions/{} - Deleting position", id);
    services::position_service::delete(&state.pool, id)
        .await
        .map_err(|e| {
            error!("Failed to delete position {}: {}", id, e);
            e
        })?;
    Ok(StatusCode::NO_CONTENT)
}
