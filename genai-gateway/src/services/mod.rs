pub mod extractor;
pub mod payload;
pub mod providers;

pub use extractor::{extract, Extraction, PARSE_FAILURE_MESSAGE};
pub use providers::{ContentProvider, ProviderError};
