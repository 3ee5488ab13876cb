//! # JSON-RPC Dialects Prelude
//!
//! Convenient re-exports of the most commonly used types.
//!
//! ```rust
//! use jsonrpc_dialects::prelude::*;
//! ```

pub use crate::error::{ErrorCode, ErrorObject, MarshalError, Result};
pub use crate::registry::{Message, MessageKind};
pub use crate::request::{Call, CallBuilder, Params};
pub use crate::response::{Outcome, Return};
pub use crate::types::{Dialect, RequestId, Version};

// Standard error codes
pub use crate::error_codes::*;
