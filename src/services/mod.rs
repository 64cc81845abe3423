pub mod performance;
pub mod indicators;
pub mod llm_service;
pub mod portfolio_service;
pub mod position_service;
pub mod order_service;
pub mod market_data_service;
pub mod analysis_service;
pub mod recommendation_service;
pub mod sync_service;
