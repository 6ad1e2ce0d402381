//! Content parts and generation requests, in the Gemini REST wire shape.

use serde::{Deserialize, Serialize};

/// One unit of a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

/// Binary payload embedded as base64 text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn is_inline_data(&self) -> bool {
        matches!(self, ContentPart::InlineData { .. })
    }
}

/// Ordered parts submitted in a single call. Holds at most one binary part.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationRequest {
    parts: Vec<ContentPart>,
}

impl GenerationRequest {
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            parts: vec![ContentPart::text(prompt)],
        }
    }

    pub(crate) fn from_parts(parts: Vec<ContentPart>) -> Self {
        Self { parts }
    }

    pub fn parts(&self) -> &[ContentPart] {
        &self.parts
    }

    /// Characters of prompt text across all text parts.
    pub fn prompt_len(&self) -> usize {
        self.parts
            .iter()
            .map(|p| match p {
                ContentPart::Text { text } => text.len(),
                ContentPart::InlineData { .. } => 0,
            })
            .sum()
    }

    /// MIME type of the inline payload, if any.
    pub fn inline_mime_type(&self) -> Option<&str> {
        self.parts.iter().find_map(|p| match p {
            ContentPart::InlineData { inline_data } => Some(inline_data.mime_type.as_str()),
            ContentPart::Text { .. } => None,
        })
    }
}
