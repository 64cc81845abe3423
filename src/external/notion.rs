use serde::Deserialize;
use tracing::warn;

use crate::errors::AppError;

const NOTION_API_BASE: &str = "https://api.notion.com/v1";

/// Minimal Notion REST client: enough to push portfolio snapshots into a
/// database. Credentials live entirely in the environment; when the key is
/// missing the client is simply not constructed and sync endpoints report
/// the integration as unavailable.
pub struct NotionClient {
    client: reqwest::Client,
    api_key: String,
    version: String,
}

#[derive(Debug, Deserialize)]
struct NotionPage {
    id: String,
}

#[derive(Debug, Deserialize)]
struct NotionApiError {
    message: String,
}

impl NotionClient {
    pub fn from_env() -> Option<Self> {
        let api_key = match std::env::var("NOTION_API_KEY") {
            Ok(key) if !key.is_empty() => key,
            _ => {
                warn!("NOTION_API_KEY not set; Notion sync disabled");
                return None;
            }
        };

        let version = std::env::var("NOTION_VERSION")
            .unwrap_or_else(|_| "2023-12-01".to_string());

        Some(Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            api_key,
            version,
        })
    }

    /// Create a page in `database_id` with the given property payload.
    /// Returns the new page id.
    pub async fn create_page(
        &self,
        database_id: &str,
        properties: serde_json::Value,
    ) -> Result<String, AppError> {
        let body = serde_json::json!({
            "parent": { "database_id": database_id },
            "properties": properties,
        });

        let response = self
            .client
            .post(format!("{}/pages", NOTION_API_BASE))
            .bearer_auth(&self.api_key)
            .header("Notion-Version", &self.version)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::External(format!("Notion request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<NotionApiError>()
                .await
                .map(|e| e.message)
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(AppError::External(format!(
                "Notion returned {}: {}",
                status, detail
            )));
        }

        let page: NotionPage = response
            .json()
            .await
            .map_err(|e| AppError::External(format!("Failed to decode Notion response: {}", e)))?;

        Ok(page.id)
    }
}
