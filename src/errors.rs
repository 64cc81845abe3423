use axum::http::{HeaderMap, HeaderValue};
use axum::response::IntoResponse;
use http::StatusCode;
use thiserror::Error;

use crate::models::LlmProviderKind;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Rate limited by external provider")]
    RateLimited,
    #[error("External error: {0}")]
    External(String),
    #[error("Unavailable: {0}")]
    Unavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::RateLimited => {
                let mut headers = HeaderMap::new();
                headers.insert("Retry-After", HeaderValue::from_static("60"));
                (StatusCode::TOO_MANY_REQUESTS, headers, "Rate limited").into_response()
            },
            AppError::External(msg) => (StatusCode::BAD_GATEWAY, msg).into_response(),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg).into_response(),
            AppError::Db(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response(),
        }
    }
}

/// Errors from the recommendation generator. Missing configuration and
/// upstream transport failure are distinct kinds so callers can branch
/// without matching message strings. Unparsable model output is NOT an
/// error; it degrades to the fallback recommendation.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM provider {0} is not configured")]
    ProviderUnavailable(LlmProviderKind),
    #[error("LLM upstream call failed: {0}")]
    Upstream(String),
}

impl From<LlmError> for AppError {
    fn from(value: LlmError) -> Self {
        match value {
            LlmError::ProviderUnavailable(kind) => {
                AppError::Unavailable(format!("LLM provider {} is not configured", kind))
            }
            LlmError::Upstream(msg) => AppError::External(msg),
        }
    }
}
