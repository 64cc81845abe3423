use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{GenerateRecommendationRequest, StoredRecommendation};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(fetch_recommendations))
        .route("/generate", post(generate_recommendation))
}

#[derive(Debug, Deserialize)]
pub struct RecommendationListQuery {
    pub portfolio_id: Option<Uuid>,
}

pub async fn fetch_recommendations(
    State(state): State<AppState>,
    Query(query): Query<RecommendationListQuery>,
) -> Result<Json<Vec<StoredRecommendation>>, AppError> {
    info!(
        "GET /recommendations - Fetching recommendations (portfolio: {:?})",
        query.portfolio_id
    );
    let recommendations =
        services::recommendation_service::list(&state.pool, query.portfolio_id)
            .await
            .map_err(|e| {
                error!("Failed to fetch recommendations: {}", e);
                e
            })?;
    Ok(Json(recommendations))
}

/// POST /api/recommendations/generate
///
/// Assembles current market metrics for the symbol, asks the selected LLM
/// backend for a structured recommendation and persists the result. An
/// unconfigured backend maps to 503 and an upstream failure to 502; model
/// output that cannot be parsed is stored as a conservative hold.
#[axum::debug_handler]
pub async fn generate_recommendation(
    State(state): State<AppState>,
    Json(req): Json<GenerateRecommendationRequest>,
) -> Result<(StatusCode, Json<StoredRecommendation>), AppError> {
    info!(
        "POST /recommendations/generate - symbol={}, provider={:?}",
        req.symbol, req.provider
    );

    let recommendation = services::recommendation_service::generate(
        &state.pool,
        state.market_data.as_ref(),
        &state.llm,
        req,
    )
    .await
    .map_err(|e| {
        error!("Recommendation generation failed: {}", e);
        e
    })?;

    Ok((StatusCode::CREATED, Json(recommendation)))
}
