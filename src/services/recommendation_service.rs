use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::external::market_provider::MarketDataProvider;
use crate::models::{
    GenerateRecommendationRequest, LlmProviderKind, StoredRecommendation,
};
use crate::services::{analysis_service, llm_service::LlmService};

const LIST_LIMIT: i64 = 100;

/// Assemble market metrics for the symbol, run the generator against the
/// requested backend and persist the result. Generator failures
/// (unconfigured backend, upstream transport) propagate to the caller;
/// unparsable model output does not fail, it is stored as the conservative
/// fallback recommendation.
pub async fn generate(
    pool: &PgPool,
    provider: &dyn MarketDataProvider,
    llm: &LlmService,
    input: GenerateRecommendationRequest,
) -> Result<StoredRecommendation, AppError> {
    let symbol = input.symbol.trim().to_uppercase();
    if symbol.is_empty() || symbol.len() > 10 {
        return Err(AppError::Validation(
            "Invalid symbol. Must be 1-10 characters.".to_string(),
        ));
    }

    if let Some(portfolio_id) = input.portfolio_id {
        if !db::portfolio_queries::exists(pool, portfolio_id).await? {
            return Err(AppError::NotFound("Portfolio not found".to_string()));
        }
    }

    let kind = input.provider.unwrap_or(LlmProviderKind::OpenAi);

    let snapshot = analysis_service::build_snapshot(provider, &symbol).await;
    let recommendation = llm.generate_recommendation(&symbol, &snapshot, kind).await?;

    info!(
        "Generated {} recommendation for {} (confidence {})",
        recommendation.action, symbol, recommendation.confidence_score
    );

    let stored = db::recommendation_queries::insert(
        pool,
        StoredRecommendation::from_recommendation(&symbol, input.portfolio_id, &recommendation),
    )
    .await?;

    Ok(stored)
}

pub async fn list(
    pool: &PgPool,
    portfolio_id: Option<Uuid>,
) -> Result<Vec<StoredRecommendation>, AppError> {
    let recommendations =
        db::recommendation_queries::fetch_recent(pool, portfolio_id, LIST_LIMIT).await?;
    Ok(recommendations)
}
