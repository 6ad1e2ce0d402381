//! Mock provider implementation for testing.

use super::{ContentProvider, ProviderError};
use crate::models::{GenerationRequest, GenerationResponse};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Mutex;

enum Behavior {
    Respond(Value),
    Fail(String),
}

/// Mock provider that returns a canned response or error and records every
/// request it receives.
pub struct MockProvider {
    behavior: Behavior,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockProvider {
    /// Respond with `raw` as the response object.
    pub fn responding(raw: Value) -> Self {
        Self {
            behavior: Behavior::Respond(raw),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Respond with a single-candidate response carrying `text`.
    pub fn with_text(text: &str) -> Self {
        Self::responding(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        }))
    }

    /// Fail every call with an API error whose message is `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            behavior: Behavior::Fail(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ContentProvider for MockProvider {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, ProviderError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        match &self.behavior {
            Behavior::Respond(raw) => Ok(GenerationResponse::new(raw.clone())),
            Behavior::Fail(message) => Err(ProviderError::ApiError(message.clone())),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }
}
