//! Turns uploaded bytes into content parts and assembles generation requests.

use crate::models::{ContentPart, GenerationRequest, InlineData};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Wrap `buffer` as an inline-data part tagged with `mime_type`.
///
/// The MIME type is passed through untouched; callers decide what they accept.
pub fn build(buffer: &[u8], mime_type: &str) -> ContentPart {
    ContentPart::InlineData {
        inline_data: InlineData {
            mime_type: mime_type.to_string(),
            data: STANDARD.encode(buffer),
        },
    }
}

/// `[prompt, binary]` when a non-empty prompt is given, otherwise `[binary]`.
pub fn compose(prompt: Option<&str>, binary: ContentPart) -> GenerationRequest {
    let parts = match prompt {
        Some(text) if !text.is_empty() => vec![ContentPart::text(text), binary],
        _ => vec![binary],
    };
    GenerationRequest::from_parts(parts)
}
