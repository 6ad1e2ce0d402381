//! Gemini AI provider implementation.
//!
//! Calls the `generateContent` REST method once per request and hands the JSON
//! body back untouched; reading text out of it is the extractor's job.

use super::{ContentProvider, ProviderError};
use crate::config::GeminiSettings;
use crate::models::{ContentPart, GenerationRequest, GenerationResponse};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// Header carrying the API key, so it never appears in URLs or error messages.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini content provider.
pub struct GeminiProvider {
    settings: GeminiSettings,
    client: Client,
}

impl GeminiProvider {
    pub fn new(settings: GeminiSettings) -> Result<Self, ProviderError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self { settings, client })
    }

    /// Build the API URL for the given method on the configured model.
    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.settings.api_base.trim_end_matches('/'),
            self.settings.model,
            method
        )
    }
}

#[async_trait]
impl ContentProvider for GeminiProvider {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, ProviderError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: request.parts(),
            }],
        };

        tracing::debug!(
            model = %self.settings.model,
            parts = request.parts().len(),
            prompt_len = request.prompt_len(),
            mime_type = ?request.inline_mime_type(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.api_url("generateContent"))
            .header(API_KEY_HEADER, self.settings.api_key())
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let mut message = upstream_message(&error_text);
            if message.is_empty() {
                message = format!("Gemini API returned {}", status);
            }

            tracing::warn!(
                status = status.as_u16(),
                model = %self.settings.model,
                error = %message,
                "Gemini API request failed"
            );

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(ProviderError::RateLimited(message));
            }
            return Err(ProviderError::ApiError(message));
        }

        let raw: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to read response: {}", e)))?;

        Ok(GenerationResponse::new(raw))
    }

    fn model(&self) -> &str {
        &self.settings.model
    }
}

/// `error.message` from a Google API error body, or the body itself.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: &'a [ContentPart],
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}
