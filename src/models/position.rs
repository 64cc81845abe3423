use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Represents the current holdings of a particular symbol within a portfolio.
// Pricing fields are nullable: a freshly created position has no quote yet,
// and the performance roll-up treats absent values as zero contribution.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Position {
    pub id: uuid::Uuid,
    pub portfolio_id: uuid::Uuid,
    pub symbol: String,
    pub quantity: BigDecimal,
    pub average_cost: Option<BigDecimal>,
    pub current_price: Option<BigDecimal>,
    pub market_value: Option<BigDecimal>,
    pub unrealized_pnl: Option<BigDecimal>,
    pub unrealized_pnl_percent: Option<BigDecimal>,
    pub last_updated: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePosition {
    pub symbol: String,
    pub quantity: BigDecimal,
    pub average_cost: Option<BigDecimal>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatePosition {
    pub quantity: Option<BigDecimal>,
    pub average_cost: Option<BigDecimal>,
}

impl Position {
    pub(crate) fn new(portfolio_id: uuid::Uuid, input: CreatePosition) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: uuid::Uuid::new_v4(),
            portfolio_id,
            symbol: input.symbol.to_uppercase(),
            quantity: input.quantity,
            average_cost: input.average_cost,
            current_price: None,
            market_value: None,
            unrealized_pnl: None,
            unrealized_pnl_percent: None,
            last_updated: now,
            created_at: now,
        }
    }
}
