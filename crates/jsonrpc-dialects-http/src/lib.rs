//! # JSON-RPC dialects over HTTP
//!
//! Binds the canonical [`Call`](jsonrpc_dialects::Call) and
//! [`Return`](jsonrpc_dialects::Return) values of `jsonrpc-dialects` onto
//! `http` requests and responses.
//!
//! ## Supported Shapes
//! - **POST**: the deflated message as the JSON body
//! - **Encoded GET**: `params` as JSON text or base64-encoded JSON
//! - **Query GET**: params flattened into query parameters
//! - **REST GET**: method as the last path segment
//!
//! ## Features
//! - Per-revision content types
//! - Error synthesis for failed HTTP responses
//! - Pluggable param expansion and response sinks

pub mod binding;
pub mod config;
pub mod expand;
pub mod prelude;
pub mod query;
mod request;
mod response;
pub mod sink;

// Re-export main types
pub use binding::{HttpBinding, RequestOptions};
pub use config::{ContentTypes, HttpBindingBuilder, HttpBindingConfig};
pub use expand::{DottedKeyExpander, ParamExpander};
pub use sink::{ResponseSink, Setter};

// Re-export foundational types
pub use jsonrpc_dialects::{Call, MarshalError, Return};

/// Result type for HTTP binding operations
pub type Result<T> = std::result::Result<T, HttpBindingError>;

/// HTTP binding errors
#[derive(Debug, thiserror::Error)]
pub enum HttpBindingError {
    #[error("Marshalling error: {0}")]
    Marshal(#[from] MarshalError),

    #[error("Unsupported HTTP method: {0}")]
    UnsupportedTransportMethod(String),

    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("Response sink cannot set the {0}")]
    ResponseWriteFailure(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] http::Error),
}

impl From<serde_json::Error> for HttpBindingError {
    fn from(err: serde_json::Error) -> Self {
        HttpBindingError::Marshal(MarshalError::Json(err))
    }
}
