//! HTTP transport: base URL resolution, JSON POST, query-string GET, body streaming.

mod http;

pub use http::{HttpTransport, RawResponse, TransportConfig, TransportError};
