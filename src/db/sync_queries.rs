use sqlx::PgPool;
use uuid::Uuid;
use crate::models::SyncRun;

const COLUMNS: &str = "id, portfolio_id, target, status, detail, started_at, finished_at";

pub async fn insert_run(pool: &PgPool, input: SyncRun) -> Result<SyncRun, sqlx::Error> {
    sqlx::query_as::<_, SyncRun>(&format!(
        "INSERT INTO sync_runs (id, portfolio_id, target, status, detail, started_at, finished_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {COLUMNS}"
    ))
    .bind(input.id)
    .bind(input.portfolio_id)
    .bind(input.target)
    .bind(input.status)
    .bind(input.detail)
    .bind(input.started_at)
    .bind(input.finished_at)
    .fetch_one(pool)
    .await
}

pub async fn mark_finished(
    pool: &PgPool,
    id: Uuid,
    status: &str,
    detail: Option<String>,
) -> Result<Option<SyncRun>, sqlx::Error> {
    sqlx::query_as::<_, SyncRun>(&format!(
        "UPDATE sync_runs SET status = $2, detail = $3, finished_at = NOW() \
         WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(status)
    .bind(detail)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_recent(
    pool: &PgPool,
    portfolio_id: Option<Uuid>,
    limit: i64,
) -> Result<Vec<SyncRun>, sqlx::Error> {
    match portfolio_id {
        Some(pid) => {
            sqlx::query_as::<_, SyncRun>(&format!(
                "SELECT {COLUMNS} FROM sync_runs WHERE portfolio_id = $1 \
                 ORDER BY started_at DESC LIMIT $2"
            ))
            .bind(pid)
            .bind(limit)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, SyncRun>(&format!(
                "SELECT {COLUMNS} FROM sync_runs ORDER BY started_at DESC LIMIT $1"
            ))
            .bind(limit)
            .fetch_all(pool)
            .await
        }
    }
}
