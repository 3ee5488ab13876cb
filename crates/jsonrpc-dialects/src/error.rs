use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Result type for marshalling operations
pub type Result<T> = std::result::Result<T, MarshalError>;

/// Errors raised while turning wire payloads into canonical messages and back
#[derive(Debug, Error)]
pub enum MarshalError {
    #[error("Unsupported JSON-RPC version: {0}")]
    UnsupportedVersion(String),

    #[error("Cannot tell whether the payload is a call or a return")]
    AmbiguousMessageKind,

    #[error("Both 'params' and 'kwparams' were supplied")]
    ConflictingParams,

    #[error("Malformed field '{field}': {reason}")]
    MalformedField { field: &'static str, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MarshalError {
    pub fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        MarshalError::MalformedField {
            field,
            reason: reason.into(),
        }
    }
}

/// Standard JSON-RPC error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    ServerError(i64), // -32099 to -32000
}

impl ErrorCode {
    pub fn code(&self) -> i64 {
        match self {
            ErrorCode::ParseError => -32700,
            ErrorCode::InvalidRequest => -32600,
            ErrorCode::MethodNotFound => -32601,
            ErrorCode::InvalidParams => -32602,
            ErrorCode::InternalError => -32603,
            ErrorCode::ServerError(code) => *code,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::ParseError => "Parse error",
            ErrorCode::InvalidRequest => "Invalid Request",
            ErrorCode::MethodNotFound => "Method not found",
            ErrorCode::InvalidParams => "Invalid params",
            ErrorCode::InternalError => "Internal error",
            ErrorCode::ServerError(_) => "Server error",
        }
    }

    /// HTTP status an error with this code maps to when nothing more specific is known.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::ParseError | ErrorCode::InvalidRequest | ErrorCode::InvalidParams => 400,
            ErrorCode::MethodNotFound => 404,
            ErrorCode::InternalError | ErrorCode::ServerError(_) => 500,
        }
    }

    /// Classifies a raw code. Unknown codes outside the server range yield `None`.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            -32700 => Some(ErrorCode::ParseError),
            -32600 => Some(ErrorCode::InvalidRequest),
            -32601 => Some(ErrorCode::MethodNotFound),
            -32602 => Some(ErrorCode::InvalidParams),
            -32603 => Some(ErrorCode::InternalError),
            code if (SERVER_ERROR_START..=SERVER_ERROR_END).contains(&code) => {
                Some(ErrorCode::ServerError(code))
            }
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

pub const SERVER_ERROR_START: i64 = -32099;
pub const SERVER_ERROR_END: i64 = -32000;

/// Code used when an error is synthesized from an HTTP-level failure
pub const TRANSPORT_ERROR: i64 = SERVER_ERROR_END;

const DEFAULT_HTTP_STATUS: u16 = 500;

/// Structured error carried by a failed Return.
///
/// `http_status` never travels inside the JSON-RPC payload; it only tells the
/// HTTP binding which status line to use.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    pub data: Option<Value>,
    pub http_status: u16,
}

impl ErrorObject {
    /// Builds an error from a raw code. The HTTP status is derived from the code.
    pub fn with_code(code: i64, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            code,
            message: message.into(),
            data,
            http_status: ErrorCode::from_code(code)
                .map(|c| c.http_status())
                .unwrap_or(DEFAULT_HTTP_STATUS),
        }
    }

    pub fn new(code: ErrorCode, message: Option<String>, data: Option<Value>) -> Self {
        Self {
            code: code.code(),
            message: message.unwrap_or_else(|| code.message().to_string()),
            data,
            http_status: code.http_status(),
        }
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = status;
        self
    }

    pub fn parse_error(data: Option<Value>) -> Self {
        Self::new(ErrorCode::ParseError, None, data)
    }

    pub fn invalid_request(data: Option<Value>) -> Self {
        Self::new(ErrorCode::InvalidRequest, None, data)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            ErrorCode::MethodNotFound,
            Some(format!("Method '{}' not found", method)),
            None,
        )
    }

    pub fn invalid_params(message: &str) -> Self {
        Self::new(ErrorCode::InvalidParams, Some(message.to_string()), None)
    }

    pub fn internal_error(message: Option<String>) -> Self {
        Self::new(ErrorCode::InternalError, message, None)
    }

    /// # Panics
    /// If `code` is outside the reserved server range.
    pub fn server_error(code: i64, message: &str, data: Option<Value>) -> Self {
        assert!(
            (SERVER_ERROR_START..=SERVER_ERROR_END).contains(&code),
            "Server error code must be in range -32099 to -32000"
        );
        Self::new(ErrorCode::ServerError(code), Some(message.to_string()), data)
    }

    /// Error standing in for an HTTP failure whose body carried no structured error.
    pub fn transport(status: u16, message: impl Into<String>) -> Self {
        Self {
            code: TRANSPORT_ERROR,
            message: message.into(),
            data: None,
            http_status: status,
        }
    }

    /// The named code, if this is one of the standard ones.
    pub fn kind(&self) -> Option<ErrorCode> {
        ErrorCode::from_code(self.code)
    }
}

impl fmt::Display for ErrorObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JSON-RPC Error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for ErrorObject {}
