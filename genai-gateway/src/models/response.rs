//! The model's reply, kept whole, with explicit optional lookups over the few
//! fields the gateway reads.

use serde_json::Value;
use thiserror::Error;

/// Finish reasons under which the candidate's text must not be relayed.
const BLOCKING_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "RECITATION",
    "LANGUAGE",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
];

#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("response is not a JSON object")]
    NotAnObject,

    #[error("unexpected response shape: {0}")]
    Shape(String),

    #[error("prompt was blocked: {0}")]
    Blocked(String),

    #[error("response was stopped: {0}")]
    Stopped(String),

    #[error("failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Response object returned by the generation API.
///
/// The shape is not contractually stable, so the raw JSON is retained and each
/// read walks only the fields on its own path. A field elsewhere in the
/// object never affects a lookup; `null` reads as absent.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResponse {
    raw: Value,
}

/// `value[key]`, where `value` must be an object.
fn field<'a>(value: &'a Value, key: &str) -> Result<Option<&'a Value>, ResponseError> {
    let object = value
        .as_object()
        .ok_or_else(|| ResponseError::Shape(format!("expected an object holding `{}`", key)))?;
    Ok(object.get(key).filter(|v| !v.is_null()))
}

/// Elements of `value`, which must be an array.
fn items<'a>(value: &'a Value, what: &str) -> Result<&'a [Value], ResponseError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| ResponseError::Shape(format!("`{}` is not an array", what)))
}

fn string<'a>(value: &'a Value, what: &str) -> Result<&'a str, ResponseError> {
    value
        .as_str()
        .ok_or_else(|| ResponseError::Shape(format!("`{}` is not a string", what)))
}

impl GenerationResponse {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    pub fn as_value(&self) -> &Value {
        &self.raw
    }

    /// `candidates[0]`, if present.
    fn first_candidate(&self) -> Result<Option<&Value>, ResponseError> {
        if !self.raw.is_object() {
            return Err(ResponseError::NotAnObject);
        }
        let Some(candidates) = field(&self.raw, "candidates")? else {
            return Ok(None);
        };
        Ok(items(candidates, "candidates")?
            .first()
            .filter(|c| !c.is_null()))
    }

    /// `parts` of a candidate's content; empty when any level is absent.
    fn parts(candidate: &Value) -> Result<&[Value], ResponseError> {
        let Some(content) = field(candidate, "content")? else {
            return Ok(&[]);
        };
        match field(content, "parts")? {
            Some(parts) => items(parts, "parts"),
            None => Ok(&[]),
        }
    }

    /// `candidates[0].content.parts[0].text`, if every step is present.
    pub fn first_part_text(&self) -> Result<Option<String>, ResponseError> {
        let Some(candidate) = self.first_candidate()? else {
            return Ok(None);
        };
        let Some(part) = Self::parts(candidate)?.first().filter(|p| !p.is_null()) else {
            return Ok(None);
        };
        match field(part, "text")? {
            Some(text) => Ok(Some(string(text, "text")?.to_string())),
            None => Ok(None),
        }
    }

    /// Text accessor: all text parts of the first candidate, concatenated.
    ///
    /// Fails when the prompt was blocked before any candidate was produced, or
    /// when the first candidate stopped for a blocking reason.
    pub fn text(&self) -> Result<Option<String>, ResponseError> {
        let Some(candidate) = self.first_candidate()? else {
            if let Some(reason) = self.block_reason() {
                return Err(ResponseError::Blocked(reason.to_string()));
            }
            return Ok(None);
        };

        if let Some(reason) = candidate.get("finishReason").and_then(Value::as_str) {
            if BLOCKING_FINISH_REASONS.contains(&reason) {
                return Err(ResponseError::Stopped(reason.to_string()));
            }
        }

        let mut texts = Vec::new();
        for part in Self::parts(candidate)?.iter().filter(|p| !p.is_null()) {
            if let Some(text) = field(part, "text")? {
                texts.push(string(text, "text")?);
            }
        }

        if texts.is_empty() {
            Ok(None)
        } else {
            Ok(Some(texts.concat()))
        }
    }

    /// `promptFeedback.blockReason`, when it is a string.
    fn block_reason(&self) -> Option<&str> {
        self.raw
            .get("promptFeedback")?
            .get("blockReason")?
            .as_str()
    }

    /// Finish reason of the first candidate, for logging. Shape errors read as `None`.
    pub fn finish_reason(&self) -> Option<String> {
        self.first_candidate()
            .ok()??
            .get("finishReason")?
            .as_str()
            .map(str::to_string)
    }

    /// Indented (2-space) serialization of the whole response.
    pub fn to_pretty_json(&self) -> Result<String, ResponseError> {
        Ok(serde_json::to_string_pretty(&self.raw)?)
    }
}
