//! Field readers shared by the per-revision codecs.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ErrorCode, ErrorObject, MarshalError, Result};
use crate::request::Params;
use crate::types::RequestId;

/// Value under `key`, treating JSON null as absent.
pub(crate) fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

pub(crate) fn method(obj: &Map<String, Value>) -> Result<String> {
    match obj.get("method") {
        Some(Value::String(method)) if !method.is_empty() => Ok(method.clone()),
        Some(_) => Err(MarshalError::malformed("method", "must be a non-empty string")),
        None => Err(MarshalError::malformed("method", "missing")),
    }
}

pub(crate) fn id(obj: &Map<String, Value>) -> Result<Option<RequestId>> {
    match obj.get("id") {
        Some(value) => RequestId::from_value(value),
        None => Ok(None),
    }
}

/// Params under `field`. Positional always accepted, named only when `allow_named`.
pub(crate) fn params(
    obj: &Map<String, Value>,
    field: &'static str,
    allow_named: bool,
) -> Result<Option<Params>> {
    let Some(value) = present(obj, field) else {
        return Ok(None);
    };
    match Params::from_value(value.clone()) {
        Some(Params::Named(_)) if !allow_named => {
            Err(MarshalError::malformed(field, "must be an array"))
        }
        Some(params) => Ok(Some(params)),
        None if allow_named => Err(MarshalError::malformed(field, "must be an array or an object")),
        None => Err(MarshalError::malformed(field, "must be an array")),
    }
}

/// Strictly typed error object as used by 1.1 and 2.0.
///
/// `data_keys` lists the members holding the error data, first match wins.
pub(crate) fn strict_error(value: &Value, data_keys: &[&str]) -> Result<ErrorObject> {
    let Value::Object(obj) = value else {
        return Err(MarshalError::malformed("error", "must be an object"));
    };
    let code = obj
        .get("code")
        .and_then(Value::as_i64)
        .ok_or_else(|| MarshalError::malformed("error.code", "must be an integer"))?;
    let message = obj
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| MarshalError::malformed("error.message", "must be a string"))?;
    // an explicit null is data too
    let data = data_keys.iter().find_map(|key| obj.get(*key)).cloned();
    Ok(ErrorObject::with_code(code, message, data))
}

/// 1.0 never pinned down the error member, so anything goes.
pub(crate) fn loose_error(value: &Value) -> ErrorObject {
    let fallback = ErrorCode::InternalError;
    match value {
        Value::Object(obj) => {
            let code = obj.get("code").and_then(Value::as_i64);
            let message = obj.get("message").and_then(Value::as_str);
            let data = if code.is_none() && message.is_none() {
                Some(value.clone())
            } else {
                obj.get("data").cloned()
            };
            ErrorObject::with_code(
                code.unwrap_or_else(|| fallback.code()),
                message.unwrap_or_else(|| fallback.message()),
                data,
            )
        }
        Value::String(message) => ErrorObject::with_code(fallback.code(), message.clone(), None),
        other => ErrorObject::with_code(fallback.code(), fallback.message(), Some(other.clone())),
    }
}

/// `{code, message, data?}` as written by 1.0 and 2.0
#[derive(Serialize)]
pub(crate) struct ErrorBody<'a> {
    pub code: i64,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<&'a Value>,
}

impl<'a> From<&'a ErrorObject> for ErrorBody<'a> {
    fn from(error: &'a ErrorObject) -> Self {
        Self {
            code: error.code,
            message: &error.message,
            data: error.data.as_ref(),
        }
    }
}
