use sqlx::PgPool;
use uuid::Uuid;
use crate::models::StoredRecommendation;

const COLUMNS: &str = "id, portfolio_id, symbol, action, confidence_score, target_price, \
                       stop_loss, time_horizon, reasoning, status, created_at";

pub async fn insert(
    pool: &PgPool,
    input: StoredRecommendation,
) -> Result<StoredRecommendation, sqlx::Error> {
    sqlx::query_as::<_, StoredRecommendation>(&format!(
        "INSERT INTO recommendations \
         (id, portfolio_id, symbol, action, confidence_score, target_price, stop_loss, time_horizon, reasoning, status, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING {COLUMNS}"
    ))
    .bind(input.id)
    .bind(input.portfolio_id)
    .bind(input.symbol)
    .bind(input.action)
    .bind(input.confidence_score)
    .bind(input.target_price)
    .bind(input.stop_loss)
    .bind(input.time_horizon)
    .bind(input.reasoning)
    .bind(input.status)
    .bind(input.created_at)
    .fetch_one(pool)
    .await
}

pub async fn fetch_recent(
    pool: &PgPool,
    portfolio_id: Option<Uuid>,
    limit: i64,
) -> Result<Vec<StoredRecommendation>, sqlx::Error> {
    match portfolio_id {
        Some(pid) => {
            sqlx::query_as::<_, StoredRecommendation>(&format!(
                "SELECT {COLUMNS} FROM recommendations WHERE portfolio_id = $1 \
                 ORDER BY created_at DESC LIMIT $2"
            ))
            .bind(pid)
            .bind(limit)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, StoredRecommendation>(&format!(
                "SELECT {COLUMNS} FROM recommendations ORDER BY created_at DESC LIMIT $1"
            ))
            .bind(limit)
            .fetch_all(pool)
            .await
        }
    }
}
