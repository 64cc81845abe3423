mod portfolio;
mod position;
mod order;
mod performance;
mod recommendation;
mod analysis;
mod market;
mod sync;

pub use portfolio::{Portfolio, CreatePortfolio, UpdatePortfolio};
pub use position::{Position, CreatePosition, UpdatePosition};
pub use order::{Order, CreateOrder};
pub use performance::{PerformanceSummary, PortfolioPerformance};
pub use recommendation::{
    Recommendation, StoredRecommendation, RecommendationAction, TimeHorizon,
    LlmProviderKind, GenerateRecommendationRequest,
};
pub use analysis::{AnalysisSnapshot, AnalysisRequest, TechnicalAnalysis, FundamentalAnalysis};
pub use market::{Quote, StockInfo, PricePoint, PriceHistory, HistoryQuery};
pub use sync::{SyncTarget, SyncRun, SyncRequest, SyncStatusQuery, SyncStatusResponse};
