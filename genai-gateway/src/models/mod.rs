//! Domain models for the gateway.

pub mod content;
pub mod response;

pub use content::{ContentPart, GenerationRequest, InlineData};
pub use response::{GenerationResponse, ResponseError};
