use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncTarget {
    Notion,
    Gsheet,
}

impl SyncTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncTarget::Notion => "notion",
            SyncTarget::Gsheet => "gsheet",
        }
    }
}

impl std::fmt::Display for SyncTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One recorded push of portfolio data to an external integration.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SyncRun {
    pub id: Uuid,
    pub portfolio_id: Uuid,
    pub target: String,
    pub status: String,
    pub detail: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl SyncRun {
    pub(crate) fn started(portfolio_id: Uuid, target: SyncTarget) -> Self {
        Self {
            id: Uuid::new_v4(),
            portfolio_id,
            target: target.as_str().to_string(),
            status: "running".to_string(),
            detail: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    pub portfolio_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SyncStatusQuery {
    pub portfolio_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct SyncStatusResponse {
    pub runs: Vec<SyncRun>,
}
