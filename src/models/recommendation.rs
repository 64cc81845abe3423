use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Which LLM backend to send a recommendation prompt to. The two backends
/// are interchangeable behind the `LlmProvider` trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderKind {
    OpenAi,
    Anthropic,
}

impl std::fmt::Display for LlmProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProviderKind::OpenAi => write!(f, "openai"),
            LlmProviderKind::Anthropic => write!(f, "anthropic"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationAction {
    Buy,
    Sell,
    Hold,
}

impl RecommendationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationAction::Buy => "buy",
            RecommendationAction::Sell => "sell",
            RecommendationAction::Hold => "hold",
        }
    }
}

impl std::fmt::Display for RecommendationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeHorizon {
    #[serde(rename = "short-term")]
    ShortTerm,
    #[serde(rename = "medium-term")]
    MediumTerm,
    #[serde(rename = "long-term")]
    LongTerm,
}

impl TimeHorizon {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeHorizon::ShortTerm => "short-term",
            TimeHorizon::MediumTerm => "medium-term",
            TimeHorizon::LongTerm => "long-term",
        }
    }
}

impl std::fmt::Display for TimeHorizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured trading recommendation. Field names are the wire contract
/// and must stay stable: action, confidence_score, target_price, stop_loss,
/// time_horizon, reasoning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: RecommendationAction,
    pub confidence_score: f64,
    #[serde(default)]
    pub target_price: Option<BigDecimal>,
    #[serde(default)]
    pub stop_loss: Option<BigDecimal>,
    #[serde(default)]
    pub time_horizon: Option<TimeHorizon>,
    pub reasoning: String,
}

impl Recommendation {
    /// Conservative default used when the model's response cannot be parsed
    /// as structured data. Carries the raw text so consumers can tell a
    /// fallback apart from a modeled recommendation.
    pub fn fallback(raw_text: &str) -> Self {
        Self {
            action: RecommendationAction::Hold,
            confidence_score: 0.5,
            target_price: None,
            stop_loss: None,
            time_horizon: None,
            reasoning: raw_text.to_string(),
        }
    }
}

/// Persisted recommendation row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredRecommendation {
    pub id: Uuid,
    pub portfolio_id: Option<Uuid>,
    pub symbol: String,
    pub action: String,
    pub confidence_score: f64,
    pub target_price: Option<BigDecimal>,
    pub stop_loss: Option<BigDecimal>,
    pub time_horizon: Option<String>,
    pub reasoning: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl StoredRecommendation {
    pub(crate) fn from_recommendation(
        symbol: &str,
        portfolio_id: Option<Uuid>,
        rec: &Recommendation,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            portfolio_id,
            symbol: symbol.to_uppercase(),
            action: rec.action.to_string(),
            confidence_score: rec.confidence_score,
            target_price: rec.target_price.clone(),
            stop_loss: rec.stop_loss.clone(),
            time_horizon: rec.time_horizon.map(|h| h.to_string()),
            reasoning: rec.reasoning.clone(),
            status: "active".to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateRecommendationRequest {
    pub symbol: String,
    pub provider: Option<LlmProviderKind>,
    pub portfolio_id: Option<Uuid>,
}
