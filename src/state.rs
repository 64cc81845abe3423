use std::sync::Arc;

use sqlx::PgPool;

use crate::external::gsheets::SheetsClient;
use crate::external::market_provider::MarketDataProvider;
use crate::external::notion::NotionClient;
use crate::services::llm_service::LlmService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub market_data: Arc<dyn MarketDataProvider>,
    pub llm: Arc<LlmService>,
    pub notion: Option<Arc<NotionClient>>,
    pub sheets: Option<Arc<SheetsClient>>,
}
