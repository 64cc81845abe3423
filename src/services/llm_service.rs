use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::LlmError;
use crate::models::{AnalysisSnapshot, LlmProviderKind, Recommendation};

/// Configuration for the recommendation generator. Passed in explicitly at
/// construction so the service can be built with fake credentials in tests;
/// there is no process-wide client state.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub max_tokens: usize,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: "gpt-4-turbo-preview".to_string(),
            anthropic_api_key: None,
            anthropic_model: "claude-3-opus-20240229".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
        }
    }
}

impl LlmConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            openai_api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            openai_model: std::env::var("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            anthropic_model: std::env::var("ANTHROPIC_MODEL").unwrap_or(defaults.anthropic_model),
            max_tokens: defaults.max_tokens,
            temperature: defaults.temperature,
        }
    }
}

/// Capability contract shared by both backends: one rendered prompt in, one
/// textual response body out. The backends are interchangeable from the
/// generator's point of view.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn submit_prompt(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: String,
}

/// OpenAI chat-completions backend.
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    max_tokens: usize,
    temperature: f32,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: String, max_tokens: usize, temperature: f32) -> Self {
        Self {
            api_key,
            model,
            max_tokens,
            temperature,
            client: http_client(),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn submit_prompt(&self, prompt: &str) -> Result<String, LlmError> {
        let request = OpenAiRequest {
            model: self.model.clone(),
            messages: vec![
                OpenAiMessage {
                    role: "system".to_string(),
                    content: "You are an expert financial advisor providing trading recommendations."
                        .to_string(),
                },
                OpenAiMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Upstream(format!("OpenAI request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Upstream(format!(
                "OpenAI returned HTTP {}: {}",
                status, body
            )));
        }

        let parsed: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Upstream(format!("Invalid OpenAI response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::Upstream("No choices in OpenAI response".to_string()))
    }
}

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: usize,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum AnthropicContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Unknown,
}

/// Anthropic messages-API backend.
pub struct AnthropicProvider {
    api_key: String,
    model: String,
    max_tokens: usize,
    client: Client,
}

impl AnthropicProvider {
    pub fn new(api_key: String, model: String, max_tokens: usize) -> Self {
        Self {
            api_key,
            model,
            max_tokens,
            client: http_client(),
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn submit_prompt(&self, prompt: &str) -> Result<String, LlmError> {
        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Upstream(format!("Anthropic request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Upstream(format!(
                "Anthropic returned HTTP {}: {}",
                status, body
            )));
        }

        let parsed: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Upstream(format!("Invalid Anthropic response: {}", e)))?;

        parsed
            .content
            .into_iter()
            .find_map(|block| match block {
                AnthropicContentBlock::Text { text } => Some(text),
                AnthropicContentBlock::Unknown => None,
            })
            .ok_or_else(|| LlmError::Upstream("No text content in Anthropic response".to_string()))
    }
}

fn http_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(60))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Dispatches recommendation generation to whichever backends are
/// configured. Stateless between calls; one outbound request per generation.
pub struct LlmService {
    openai: Option<Arc<dyn LlmProvider>>,
    anthropic: Option<Arc<dyn LlmProvider>>,
}

impl LlmService {
    pub fn new(config: LlmConfig) -> Self {
        let openai = match &config.openai_api_key {
            Some(key) => {
                info!("OpenAI backend configured (model: {})", config.openai_model);
                Some(Arc::new(OpenAiProvider::new(
                    key.clone(),
                    config.openai_model.clone(),
                    config.max_tokens,
                    config.temperature,
                )) as Arc<dyn LlmProvider>)
            }
            None => {
                warn!("OpenAI API key not configured; openai backend disabled");
                None
            }
        };

        let anthropic = match &config.anthropic_api_key {
            Some(key) => {
                info!("Anthropic backend configured (model: {})", config.anthropic_model);
                Some(Arc::new(AnthropicProvider::new(
                    key.clone(),
                    config.anthropic_model.clone(),
                    config.max_tokens,
                )) as Arc<dyn LlmProvider>)
            }
            None => {
                warn!("Anthropic API key not configured; anthropic backend disabled");
                None
            }
        };

        Self { openai, anthropic }
    }

    #[cfg(test)]
    fn with_providers(
        openai: Option<Arc<dyn LlmProvider>>,
        anthropic: Option<Arc<dyn LlmProvider>>,
    ) -> Self {
        Self { openai, anthropic }
    }

    fn provider(&self, kind: LlmProviderKind) -> Option<&Arc<dyn LlmProvider>> {
        match kind {
            LlmProviderKind::OpenAi => self.openai.as_ref(),
            LlmProviderKind::Anthropic => self.anthropic.as_ref(),
        }
    }

    /// Generate a trading recommendation for `symbol` from the assembled
    /// metrics. Fails before any network call when the requested backend has
    /// no configuration; transport failures propagate uncaught. Unparsable
    /// model output never fails, it degrades to the fallback recommendation.
    pub async fn generate_recommendation(
        &self,
        symbol: &str,
        metrics: &AnalysisSnapshot,
        kind: LlmProviderKind,
    ) -> Result<Recommendation, LlmError> {
        let provider = self
            .provider(kind)
            .ok_or(LlmError::ProviderUnavailable(kind))?;

        let prompt = build_recommendation_prompt(symbol, metrics);
        info!("Requesting {} recommendation for {}", kind, symbol);

        let raw = provider.submit_prompt(&prompt).await?;

        Ok(parse_recommendation(&raw))
    }
}

fn metric(value: Option<f64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Render the recommendation prompt. Pure and deterministic: identical
/// inputs produce byte-identical text. Absent metrics render as the literal
/// "N/A" placeholder rather than being omitted from the template.
pub fn build_recommendation_prompt(symbol: &str, metrics: &AnalysisSnapshot) -> String {
    format!(
        "Analyze the following stock and provide a trading recommendation:\n\
         \n\
         Symbol: {symbol}\n\
         Current Price: ${current_price}\n\
         Market Cap: ${market_cap}\n\
         P/E Ratio: {pe_ratio}\n\
         RSI: {rsi}\n\
         MACD: {macd}\n\
         50-day MA: ${ma_50}\n\
         200-day MA: ${ma_200}\n\
         \n\
         Provide your recommendation in the following JSON format:\n\
         {{\n\
         \x20 \"action\": \"buy|sell|hold\",\n\
         \x20 \"confidence_score\": 0.0-1.0,\n\
         \x20 \"target_price\": 0.00,\n\
         \x20 \"stop_loss\": 0.00,\n\
         \x20 \"time_horizon\": \"short-term|medium-term|long-term\",\n\
         \x20 \"reasoning\": \"Detailed explanation of your recommendation\"\n\
         }}",
        symbol = symbol,
        current_price = metric(metrics.current_price),
        market_cap = metric(metrics.market_cap),
        pe_ratio = metric(metrics.pe_ratio),
        rsi = metric(metrics.rsi),
        macd = metric(metrics.macd),
        ma_50 = metric(metrics.ma_50),
        ma_200 = metric(metrics.ma_200),
    )
}

/// Parse a model response into a Recommendation. Total over arbitrary text:
/// the substring from the first '{' to the last '}' is decoded as JSON, and
/// any failure (no braces, malformed JSON, action outside the enum) falls
/// back to hold / 0.5 with the raw text as reasoning. A successfully decoded
/// confidence_score is clamped to [0, 1].
pub fn parse_recommendation(raw: &str) -> Recommendation {
    let (start, end) = match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => return Recommendation::fallback(raw),
    };

    match serde_json::from_str::<Recommendation>(&raw[start..=end]) {
        Ok(mut rec) => {
            if !(0.0..=1.0).contains(&rec.confidence_score) {
                warn!(
                    "Model confidence_score {} outside [0, 1]; clamping",
                    rec.confidence_score
                );
                rec.confidence_score = rec.confidence_score.clamp(0.0, 1.0);
            }
            rec
        }
        Err(e) => {
            warn!("Failed to parse model response as JSON: {}", e);
            Recommendation::fallback(raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecommendationAction, TimeHorizon};
    use bigdecimal::BigDecimal;

    fn snapshot() -> AnalysisSnapshot {
        AnalysisSnapshot {
            current_price: Some(182.5),
            market_cap: Some(2.9e12),
            pe_ratio: Some(28.4),
            rsi: Some(61.2),
            macd: Some(1.8),
            ma_50: Some(178.1),
            ma_200: Some(165.9),
        }
    }

    #[test]
    fn prompt_is_deterministic() {
        let metrics = snapshot();
        let a = build_recommendation_prompt("AAPL", &metrics);
        let b = build_recommendation_prompt("AAPL", &metrics);
        assert_eq!(a, b);
    }

    #[test]
    fn prompt_renders_missing_metrics_as_na() {
        let metrics = AnalysisSnapshot {
            current_price: Some(42.0),
            ..Default::default()
        };
        let prompt = build_recommendation_prompt("TSLA", &metrics);

        assert!(prompt.contains("Symbol: TSLA"));
        assert!(prompt.contains("Current Price: $42"));
        assert!(prompt.contains("Market Cap: $N/A"));
        assert!(prompt.contains("P/E Ratio: N/A"));
        assert!(prompt.contains("RSI: N/A"));
        assert!(prompt.contains("200-day MA: $N/A"));
    }

    #[test]
    fn prompt_names_all_contract_fields() {
        let prompt = build_recommendation_prompt("MSFT", &AnalysisSnapshot::default());
        for field in [
            "\"action\"",
            "\"confidence_score\"",
            "\"target_price\"",
            "\"stop_loss\"",
            "\"time_horizon\"",
            "\"reasoning\"",
        ] {
            assert!(prompt.contains(field), "prompt missing {}", field);
        }
    }

    #[test]
    fn parse_extracts_embedded_json() {
        let raw = "Here is my view: {\"action\":\"buy\",\"confidence_score\":0.8,\
                   \"target_price\":150.0,\"stop_loss\":120.0,\
                   \"time_horizon\":\"short-term\",\"reasoning\":\"strong momentum\"}";

        let rec = parse_recommendation(raw);

        assert_eq!(rec.action, RecommendationAction::Buy);
        assert_eq!(rec.confidence_score, 0.8);
        assert_eq!(rec.target_price, Some(BigDecimal::from(150)));
        assert_eq!(rec.stop_loss, Some(BigDecimal::from(120)));
        assert_eq!(rec.time_horizon, Some(TimeHorizon::ShortTerm));
        assert_eq!(rec.reasoning, "strong momentum");
    }

    #[test]
    fn parse_without_braces_falls_back() {
        let raw = "I think you should hold for now";
        let rec = parse_recommendation(raw);

        assert_eq!(rec.action, RecommendationAction::Hold);
        assert_eq!(rec.confidence_score, 0.5);
        assert_eq!(rec.reasoning, raw);
        assert_eq!(rec.target_price, None);
        assert_eq!(rec.time_horizon, None);
    }

    #[test]
    fn parse_truncated_json_falls_back() {
        let raw = "{\"action\": \"buy\"";
        let rec = parse_recommendation(raw);

        assert_eq!(rec.action, RecommendationAction::Hold);
        assert_eq!(rec.confidence_score, 0.5);
        assert_eq!(rec.reasoning, raw);
    }

    #[test]
    fn parse_malformed_json_between_braces_falls_back() {
        let raw = "{\"action\": \"buy\",}";
        let rec = parse_recommendation(raw);

        assert_eq!(rec.action, RecommendationAction::Hold);
        assert_eq!(rec.reasoning, raw);
    }

    #[test]
    fn parse_reversed_braces_falls_back() {
        let raw = "} no object here {";
        let rec = parse_recommendation(raw);

        assert_eq!(rec.action, RecommendationAction::Hold);
        assert_eq!(rec.reasoning, raw);
    }

    #[test]
    fn parse_rejects_action_outside_enum() {
        let raw = "{\"action\":\"strong buy\",\"confidence_score\":0.9,\
                   \"reasoning\":\"to the moon\"}";
        let rec = parse_recommendation(raw);

        assert_eq!(rec.action, RecommendationAction::Hold);
        assert_eq!(rec.confidence_score, 0.5);
        assert_eq!(rec.reasoning, raw);
    }

    #[test]
    fn parse_clamps_out_of_range_confidence() {
        let raw = "{\"action\":\"sell\",\"confidence_score\":1.7,\"reasoning\":\"overbought\"}";
        let rec = parse_recommendation(raw);

        assert_eq!(rec.action, RecommendationAction::Sell);
        assert_eq!(rec.confidence_score, 1.0);
    }

    struct CannedProvider {
        response: String,
    }

    #[async_trait]
    impl LlmProvider for CannedProvider {
        async fn submit_prompt(&self, _prompt: &str) -> Result<String, LlmError> {
            Ok(self.response.clone())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl LlmProvider for FailingProvider {
        async fn submit_prompt(&self, _prompt: &str) -> Result<String, LlmError> {
            Err(LlmError::Upstream("connection reset".to_string()))
        }
    }

    #[tokio::test]
    async fn unconfigured_provider_fails_without_network() {
        let service = LlmService::new(LlmConfig::default());

        let result = service
            .generate_recommendation("AAPL", &snapshot(), LlmProviderKind::OpenAi)
            .await;

        assert!(matches!(
            result,
            Err(LlmError::ProviderUnavailable(LlmProviderKind::OpenAi))
        ));

        let result = service
            .generate_recommendation("AAPL", &snapshot(), LlmProviderKind::Anthropic)
            .await;

        assert!(matches!(
            result,
            Err(LlmError::ProviderUnavailable(LlmProviderKind::Anthropic))
        ));
    }

    #[tokio::test]
    async fn generation_parses_provider_response() {
        let provider = Arc::new(CannedProvider {
            response: "{\"action\":\"buy\",\"confidence_score\":0.75,\
                       \"reasoning\":\"uptrend intact\"}"
                .to_string(),
        });
        let service = LlmService::with_providers(Some(provider), None);

        let rec = service
            .generate_recommendation("AAPL", &snapshot(), LlmProviderKind::OpenAi)
            .await
            .unwrap();

        assert_eq!(rec.action, RecommendationAction::Buy);
        assert_eq!(rec.confidence_score, 0.75);
    }

    #[tokio::test]
    async fn generation_absorbs_prose_responses() {
        let provider = Arc::new(CannedProvider {
            response: "Too volatile to call right now.".to_string(),
        });
        let service = LlmService::with_providers(None, Some(provider));

        let rec = service
            .generate_recommendation("TSLA", &snapshot(), LlmProviderKind::Anthropic)
            .await
            .unwrap();

        assert_eq!(rec.action, RecommendationAction::Hold);
        assert_eq!(rec.reasoning, "Too volatile to call right now.");
    }

    #[tokio::test]
    async fn upstream_failures_propagate() {
        let service = LlmService::with_providers(Some(Arc::new(FailingProvider)), None);

        let result = service
            .generate_recommendation("AAPL", &snapshot(), LlmProviderKind::OpenAi)
            .await;

        assert!(matches!(result, Err(LlmError::Upstream(_))));
    }
}
