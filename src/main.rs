mod app;
mod db;
mod errors;
mod external;
mod logging;
mod models;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use crate::external::gsheets::SheetsClient;
use crate::external::market_provider::MarketDataProvider;
use crate::external::notion::NotionClient;
use crate::external::yahoo::YahooFinanceProvider;
use crate::logging::LoggingConfig;
use crate::services::llm_service::{LlmConfig, LlmService};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    logging::init_logging(LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    let database_url = std::env::var("DATABASE_URL")?;
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    let market_data: Arc<dyn MarketDataProvider> = Arc::new(YahooFinanceProvider::new());
    tracing::info!("Market data provider: Yahoo Finance");

    let llm = Arc::new(LlmService::new(LlmConfig::from_env()));
    let notion = NotionClient::from_env().map(Arc::new);
    let sheets = SheetsClient::from_env().map(Arc::new);

    let state = AppState {
        pool,
        market_data,
        llm,
        notion,
        sheets,
    };
    let app = app::create_app(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Croesus backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
