use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Portfolio-level roll-up of per-position values, cost basis and unrealized
/// P&L. Computed on demand from the current position snapshot and never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub total_value: BigDecimal,
    pub total_cost: BigDecimal,
    pub total_pnl: BigDecimal,
    pub total_return_percent: BigDecimal,
    pub num_positions: usize,
}

/// Response shape of GET /api/portfolios/:id/performance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioPerformance {
    pub portfolio_id: Uuid,
    #[serde(flatten)]
    pub summary: PerformanceSummary,
}
