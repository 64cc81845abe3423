use serde::Deserialize;
use tracing::warn;

use crate::errors::AppError;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Minimal Google Sheets values client. Auth is a bearer token minted
/// outside this process (service-account flow); the token is read from the
/// environment at startup.
pub struct SheetsClient {
    client: reqwest::Client,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct SheetsApiError {
    error: SheetsApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct SheetsApiErrorBody {
    message: String,
}

impl SheetsClient {
    pub fn from_env() -> Option<Self> {
        let access_token = match std::env::var("GSHEETS_ACCESS_TOKEN") {
            Ok(token) if !token.is_empty() => token,
            _ => {
                warn!("GSHEETS_ACCESS_TOKEN not set; Google Sheets sync disabled");
                return None;
            }
        };

        Some(Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            access_token,
        })
    }

    /// Append one row of cell values to `range` (e.g. "Portfolio Performance!A:G").
    pub async fn append_row(
        &self,
        spreadsheet_id: &str,
        range: &str,
        row: Vec<serde_json::Value>,
    ) -> Result<(), AppError> {
        let url = format!(
            "{}/{}/values/{}:append",
            SHEETS_API_BASE, spreadsheet_id, range
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&serde_json::json!({ "values": [row] }))
            .send()
            .await
            .map_err(|e| AppError::External(format!("Sheets request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<SheetsApiError>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(AppError::External(format!(
                "Sheets returned {}: {}",
                status, detail
            )));
        }

        Ok(())
    }
}
