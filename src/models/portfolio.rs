use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Represents a logical grouping of investments. A portfolio is either a
// mirror of a real brokerage account ("real") or a paper portfolio ("virtual").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Portfolio {
    pub id: uuid::Uuid,
    pub name: String,
    pub portfolio_type: String,
    pub currency: String,
    pub initial_capital: Option<BigDecimal>,
    pub notion_database_id: Option<String>,
    pub gsheet_id: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePortfolio {
    pub name: String,
    pub portfolio_type: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub initial_capital: Option<BigDecimal>,
    pub notion_database_id: Option<String>,
    pub gsheet_id: Option<String>,
}

fn default_currency() -> String {
    "USD".to_string()
}

// All fields optional; unset fields keep their stored value.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatePortfolio {
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub notion_database_id: Option<String>,
    pub gsheet_id: Option<String>,
}

impl Portfolio {
    pub(crate) fn new(input: CreatePortfolio) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: uuid::Uuid::new_v4(),
            name: input.name,
            portfolio_type: input.portfolio_type,
            currency: input.currency,
            initial_capital: input.initial_capital,
            notion_database_id: input.notion_database_id,
            gsheet_id: input.gsheet_id,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
