pub mod metrics;
pub mod security_headers;
pub mod tracing;

pub use self::metrics::{get_metrics, init_metrics, metrics_middleware};
pub use security_headers::security_headers_middleware;
pub use self::tracing::{REQUEST_ID_HEADER, request_id_middleware};
