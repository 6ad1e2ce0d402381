//! Best-effort extraction of generated text from a model response.

use crate::models::{GenerationResponse, ResponseError};
use metrics::counter;

/// Returned to callers when the response could not be read at all.
pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse AI response.";

/// What [`extract`] found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Generated text from one of the known access paths.
    Text(String),
    /// No text field matched; the whole response, pretty-printed.
    Raw(String),
    /// Reading the response failed; carries the reason.
    ParseFailed(String),
}

impl Extraction {
    /// Caller-visible string for this outcome.
    pub fn into_text(self) -> String {
        match self {
            Extraction::Text(text) | Extraction::Raw(text) => text,
            Extraction::ParseFailed(_) => PARSE_FAILURE_MESSAGE.to_string(),
        }
    }

    fn outcome(&self) -> &'static str {
        match self {
            Extraction::Text(_) => "text",
            Extraction::Raw(_) => "raw",
            Extraction::ParseFailed(_) => "parse_failed",
        }
    }
}

/// Locate the generated text in `response`.
///
/// Tries `candidates[0].content.parts[0].text`, then the response's text
/// accessor, then falls back to the serialized response so nothing is lost.
/// Any read failure is logged and reported as [`Extraction::ParseFailed`].
pub fn extract(response: &GenerationResponse) -> Extraction {
    let extraction = match try_extract(response) {
        Ok(extraction) => extraction,
        Err(e) => {
            tracing::error!(error = %e, "Failed to parse AI response");
            Extraction::ParseFailed(e.to_string())
        }
    };

    counter!("genai_extraction_total", "outcome" => extraction.outcome()).increment(1);

    extraction
}

fn try_extract(response: &GenerationResponse) -> Result<Extraction, ResponseError> {
    if let Some(text) = non_empty(response.first_part_text()?) {
        return Ok(Extraction::Text(text));
    }

    if let Some(text) = non_empty(response.text()?) {
        return Ok(Extraction::Text(text));
    }

    tracing::warn!(
        finish_reason = ?response.finish_reason(),
        "No text in AI response; returning raw response"
    );
    Ok(Extraction::Raw(response.to_pretty_json()?))
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.is_empty())
}
