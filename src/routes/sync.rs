use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{SyncRequest, SyncRun, SyncStatusQuery, SyncStatusResponse};
use crate::services;
use crate::state::AppState;

const STATUS_LIMIT: i64 = 20;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/notion", post(sync_notion))
        .route("/gsheet", post(sync_gsheet))
        .route("/status", get(sync_status))
}

/// POST /api/sync/notion
///
/// Pushes the portfolio's current performance snapshot to its linked Notion
/// database. 503 when the Notion integration is not configured.
#[axum::debug_handler]
pub async fn sync_notion(
    State(state): State<AppState>,
    Json(req): Json<SyncRequest>,
) -> Result<Json<SyncRun>, AppError> {
    info!("POST /sync/notion - portfolio={}", req.portfolio_id);

    let notion = state.notion.as_ref().ok_or_else(|| {
        AppError::Unavailable("Notion integration is not configured".to_string())
    })?;

    let run = services::sync_service::sync_to_notion(&state.pool, notion, req.portfolio_id)
        .await
        .map_err(|e| {
            error!("Notion sync failed: {}", e);
            e
        })?;
    Ok(Json(run))
}

/// POST /api/sync/gsheet
///
/// Appends the portfolio's current performance snapshot to its linked
/// Google Sheet. 503 when the Sheets integration is not configured.
#[axum::debug_handler]
pub async fn sync_gsheet(
    State(state): State<AppState>,
    Json(req): Json<SyncRequest>,
) -> Result<Json<SyncRun>, AppError> {
    info!("POST /sync/gsheet - portfolio={}", req.portfolio_id);

    let sheets = state.sheets.as_ref().ok_or_else(|| {
        AppError::Unavailable("Google Sheets integration is not configured".to_string())
    })?;

    let run = services::sync_service::sync_to_gsheet(&state.pool, sheets, req.portfolio_id)
        .await
        .map_err(|e| {
            error!("Sheets sync failed: {}", e);
            e
        })?;
    Ok(Json(run))
}

pub async fn sync_status(
    State(state): State<AppState>,
    Query(query): Query<SyncStatusQuery>,
) -> Result<Json<SyncStatusResponse>, AppError> {
    info!("GET /sync/status - portfolio={:?}", query.portfolio_id);
    let runs = services::sync_service::status(&state.pool, query.portfolio_id, STATUS_LIMIT)
        .await
        .map_err(|e| {
            error!("Failed to fetch sync status: {}", e);
            e
        })?;
    Ok(Json(SyncStatusResponse { runs }))
}
