use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// A recorded trade. Orders are a ledger only; they are never routed to a
// broker and do not mutate positions.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: uuid::Uuid,
    pub portfolio_id: uuid::Uuid,
    pub symbol: String,
    pub side: String,
    pub quantity: BigDecimal,
    pub price: BigDecimal,
    pub total_value: Option<BigDecimal>,
    pub fees: BigDecimal,
    pub order_date: chrono::DateTime<chrono::Utc>,
    pub notes: Option<String>,
    pub notion_page_id: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateOrder {
    pub portfolio_id: uuid::Uuid,
    pub symbol: String,
    pub side: String,
    pub quantity: BigDecimal,
    pub price: BigDecimal,
    #[serde(default)]
    pub fees: Option<BigDecimal>,
    pub order_date: chrono::DateTime<chrono::Utc>,
    pub notes: Option<String>,
}

impl Order {
    pub(crate) fn new(input: CreateOrder) -> Self {
        let fees = input.fees.unwrap_or_else(|| BigDecimal::from(0));
        let total_value = &input.quantity * &input.price + &fees;
        Self {
            id: uuid::Uuid::new_v4(),
            portfolio_id: input.portfolio_id,
            symbol: input.symbol.to_uppercase(),
            side: input.side,
            quantity: input.quantity,
            price: input.price,
            total_value: Some(total_value),
            fees,
            order_date: input.order_date,
            notes: input.notes,
            notion_page_id: None,
            created_at: chrono::Utc::now(),
        }
    }
}
