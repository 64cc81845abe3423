use bigdecimal::ToPrimitive;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::external::gsheets::SheetsClient;
use crate::external::notion::NotionClient;
use crate::models::{PerformanceSummary, Portfolio, SyncRun, SyncTarget};
use crate::services::performance;

const SHEETS_RANGE: &str = "Portfolio Performance!A:G";

/// Push a portfolio performance snapshot to its linked Notion database.
/// Every sync is recorded as a sync_runs row, success or failure.
pub async fn sync_to_notion(
    pool: &PgPool,
    notion: &NotionClient,
    portfolio_id: Uuid,
) -> Result<SyncRun, AppError> {
    let (portfolio, summary) = load_snapshot(pool, portfolio_id).await?;

    let database_id = portfolio.notion_database_id.clone().ok_or_else(|| {
        AppError::Validation("Portfolio has no notion_database_id configured".to_string())
    })?;

    let run = db::sync_queries::insert_run(pool, SyncRun::started(portfolio_id, SyncTarget::Notion))
        .await?;

    match notion
        .create_page(&database_id, notion_properties(&portfolio, &summary))
        .await
    {
        Ok(page_id) => {
            info!("Synced portfolio {} to Notion page {}", portfolio_id, page_id);
            finish(pool, run, "succeeded", Some(format!("page {}", page_id))).await
        }
        Err(e) => {
            error!("Notion sync failed for portfolio {}: {}", portfolio_id, e);
            finish(pool, run, "failed", Some(e.to_string())).await?;
            Err(e)
        }
    }
}

/// Append a portfolio performance row to its linked Google Sheet.
pub async fn sync_to_gsheet(
    pool: &PgPool,
    sheets: &SheetsClient,
    portfolio_id: Uuid,
) -> Result<SyncRun, AppError> {
    let (portfolio, summary) = load_snapshot(pool, portfolio_id).await?;

    let spreadsheet_id = portfolio.gsheet_id.clone().ok_or_else(|| {
        AppError::Validation("Portfolio has no gsheet_id configured".to_string())
    })?;

    let run = db::sync_queries::insert_run(pool, SyncRun::started(portfolio_id, SyncTarget::Gsheet))
        .await?;

    match sheets
        .append_row(&spreadsheet_id, SHEETS_RANGE, sheet_row(&portfolio, &summary))
        .await
    {
        Ok(()) => {
            info!("Synced portfolio {} to sheet {}", portfolio_id, spreadsheet_id);
            finish(pool, run, "succeeded", None).await
        }
        Err(e) => {
            error!("Sheets sync failed for portfolio {}: {}", portfolio_id, e);
            finish(pool, run, "failed", Some(e.to_string())).await?;
            Err(e)
        }
    }
}

pub async fn status(
    pool: &PgPool,
    portfolio_id: Option<Uuid>,
    limit: i64,
) -> Result<Vec<SyncRun>, AppError> {
    let runs = db::sync_queries::fetch_recent(pool, portfolio_id, limit).await?;
    Ok(runs)
}

async fn load_snapshot(
    pool: &PgPool,
    portfolio_id: Uuid,
) -> Result<(Portfolio, PerformanceSummary), AppError> {
    let portfolio = db::portfolio_queries::fetch_one(pool, portfolio_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Portfolio not found".to_string()))?;
    let positions = db::position_queries::fetch_all(pool, portfolio_id).await?;
    Ok((portfolio, performance::compute_performance(&positions)))
}

async fn finish(
    pool: &PgPool,
    run: SyncRun,
    status: &str,
    detail: Option<String>,
) -> Result<SyncRun, AppError> {
    let finished = db::sync_queries::mark_finished(pool, run.id, status, detail)
        .await?
        .unwrap_or(run);
    Ok(finished)
}

fn notion_properties(portfolio: &Portfolio, summary: &PerformanceSummary) -> serde_json::Value {
    let mut portfolio_type = portfolio.portfolio_type.clone();
    if let Some(first) = portfolio_type.get_mut(..1) {
        first.make_ascii_uppercase();
    }

    serde_json::json!({
        "Name": { "title": [{ "text": { "content": portfolio.name } }] },
        "Type": { "select": { "name": portfolio_type } },
        "Current Value": { "number": summary.total_value.to_f64().unwrap_or(0.0) },
        "Total Return %": { "number": summary.total_return_percent.to_f64().unwrap_or(0.0) },
        "Status": { "select": { "name": if portfolio.is_active { "Active" } else { "Archived" } } },
    })
}

fn sheet_row(portfolio: &Portfolio, summary: &PerformanceSummary) -> Vec<serde_json::Value> {
    vec![
        serde_json::json!(chrono::Utc::now().date_naive().to_string()),
        serde_json::json!(portfolio.name),
        serde_json::json!(summary.total_value.to_f64().unwrap_or(0.0)),
        // No cash ledger in this system; the column is kept for sheet
        // compatibility.
        serde_json::json!(0.0),
        serde_json::json!(summary.total_cost.to_f64().unwrap_or(0.0)),
        serde_json::json!(summary.total_pnl.to_f64().unwrap_or(0.0)),
        serde_json::json!(summary.total_return_percent.to_f64().unwrap_or(0.0)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn portfolio(portfolio_type: &str, is_active: bool) -> Portfolio {
        let now = chrono::Utc::now();
        Portfolio {
            id: Uuid::new_v4(),
            name: "Growth".to_string(),
            portfolio_type: portfolio_type.to_string(),
            currency: "USD".to_string(),
            initial_capital: None,
            notion_database_id: Some("db123".to_string()),
            gsheet_id: Some("sheet123".to_string()),
            is_active,
            created_at: now,
            updated_at: now,
        }
    }

    fn summary() -> PerformanceSummary {
        PerformanceSummary {
            total_value: BigDecimal::from_str("3000").unwrap(),
            total_cost: BigDecimal::from_str("1300").unwrap(),
            total_pnl: BigDecimal::from_str("1700").unwrap(),
            total_return_percent: BigDecimal::from_str("130.77").unwrap(),
            num_positions: 2,
        }
    }

    #[test]
    fn notion_properties_shape() {
        let props = notion_properties(&portfolio("virtual", true), &summary());

        assert_eq!(props["Type"]["select"]["name"], "Virtual");
        assert_eq!(props["Status"]["select"]["name"], "Active");
        assert_eq!(props["Current Value"]["number"], 3000.0);
        assert_eq!(props["Name"]["title"][0]["text"]["content"], "Growth");
    }

    #[test]
    fn notion_properties_archived_portfolio() {
        let props = notion_properties(&portfolio("real", false), &summary());

        assert_eq!(props["Type"]["select"]["name"], "Real");
        assert_eq!(props["Status"]["select"]["name"], "Archived");
    }

    #[test]
    fn sheet_row_has_seven_columns() {
        let row = sheet_row(&portfolio("real", true), &summary());

        assert_eq!(row.len(), 7);
        assert_eq!(row[1], serde_json::json!("Growth"));
        assert_eq!(row[2], serde_json::json!(3000.0));
        assert_eq!(row[6], serde_json::json!(130.77));
    }
}
