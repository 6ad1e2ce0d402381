//! AI provider abstractions and implementations.
//!
//! Handlers depend only on [`ContentProvider`], so the Gemini backend can be
//! swapped for the mock in tests.

pub mod gemini;
pub mod mock;

use crate::models::{GenerationRequest, GenerationResponse};
use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
///
/// `Display` is what callers see in the `error` field of a 500 response. For
/// API failures it is the upstream message alone; the HTTP status is logged.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("{0}")]
    ApiError(String),

    #[error("{0}")]
    RateLimited(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError(_) => "api_error",
            ProviderError::RateLimited(_) => "rate_limited",
            ProviderError::NetworkError(_) => "network_error",
        }
    }
}

/// A generative model reachable with one request per call.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Submit `request` and return the model's response object as-is.
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, ProviderError>;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}
