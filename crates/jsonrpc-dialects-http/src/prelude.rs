//! # JSON-RPC Dialects HTTP Prelude
//!
//! ```rust
//! use jsonrpc_dialects_http::prelude::*;
//! ```

pub use crate::binding::{HttpBinding, RequestOptions};
pub use crate::config::{ContentTypes, HttpBindingBuilder, HttpBindingConfig};
pub use crate::expand::{DottedKeyExpander, ParamExpander};
pub use crate::sink::{ResponseSink, Setter};

// Re-export foundational types
pub use jsonrpc_dialects::prelude::*;

// Error types
pub use crate::{HttpBindingError, Result};
