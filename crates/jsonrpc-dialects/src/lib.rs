//! # JSON-RPC dialects
//!
//! One canonical in-memory model for the JSON-RPC revisions seen in the wild:
//! 1.0, the 1.1 working draft (with its `kwparams` alt-spec), and 2.0.
//!
//! ## Features
//! - Version detection from a decoded payload (`jsonrpc` beats `version`, default 1.0)
//! - Validated construction of [`Call`] and [`Return`] values
//! - Per-revision inflate/deflate that reproduces each revision's exact wire shape
//! - No I/O and no shared state: every function is a pure transformation

mod codec;
pub mod error;
pub mod prelude;
pub mod registry;
pub mod request;
pub mod response;
pub mod types;

// Re-export main types
pub use error::{ErrorCode, ErrorObject, MarshalError, Result};
pub use registry::{Message, MessageKind, classify, inflate, inflate_as, resolve_version};
pub use request::{Call, CallBuilder, Params};
pub use response::{Outcome, Return};
pub use types::{Dialect, RequestId, Version};

/// Standard JSON-RPC error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;

    // Server error range: -32099 to -32000
    pub use crate::error::{SERVER_ERROR_END, SERVER_ERROR_START, TRANSPORT_ERROR};
}
