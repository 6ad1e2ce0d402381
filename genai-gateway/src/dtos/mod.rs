use serde::{Deserialize, Serialize};

/// Body of `POST /generate-text`. Every field is optional so that a missing
/// prompt is reported by the handler rather than by the JSON extractor.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateTextRequest {
    #[serde(default)]
    pub prompt: Option<serde_json::Value>,
}

impl GenerateTextRequest {
    /// The prompt, when it is a non-empty string.
    pub fn prompt(&self) -> Option<&str> {
        self.prompt
            .as_ref()
            .and_then(|p| p.as_str())
            .filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub generated_text: String,
}
