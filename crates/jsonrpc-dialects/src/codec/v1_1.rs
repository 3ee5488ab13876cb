//! JSON-RPC 1.1 working draft, including the alt-spec convention that puts
//! named params under `kwparams`.

use serde::Serialize;
use serde_json::{Map, Value};

use super::fields;
use crate::error::{ErrorObject, MarshalError, Result};
use crate::request::{Call, Params};
use crate::response::Return;
use crate::types::{RequestId, Version};

const ERROR_NAME: &str = "JSONRPCError";

#[derive(Serialize)]
struct WireCall<'a> {
    version: Version,
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<&'a Params>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kwparams: Option<&'a Params>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a RequestId>,
}

#[derive(Serialize)]
struct WireError<'a> {
    name: &'static str,
    code: i64,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a Value>,
}

impl<'a> From<&'a ErrorObject> for WireError<'a> {
    fn from(error: &'a ErrorObject) -> Self {
        Self {
            name: ERROR_NAME,
            code: error.code,
            message: &error.message,
            error: error.data.as_ref(),
        }
    }
}

#[derive(Serialize)]
struct WireReturn<'a> {
    version: Version,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a RequestId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<WireError<'a>>,
}

pub(crate) fn deflate_call(call: &Call) -> Result<Value> {
    let (params, kwparams) = match call.params() {
        Some(params) if call.alt_spec() && params.is_named() => (None, Some(params)),
        params => (params, None),
    };
    Ok(serde_json::to_value(WireCall {
        version: Version::V1_1,
        method: call.method(),
        params,
        kwparams,
        id: call.id(),
    })?)
}

/// `alt_spec` forces the alt-spec flag even when the payload used `params`.
pub(crate) fn inflate_call(obj: &Map<String, Value>, alt_spec: bool) -> Result<Call> {
    let params = fields::params(obj, "params", true)?;
    let kwparams = match fields::present(obj, "kwparams") {
        Some(Value::Object(map)) => Some(map.clone()),
        Some(_) => return Err(MarshalError::malformed("kwparams", "must be an object")),
        None => None,
    };

    let mut builder = Call::builder(Version::V1_1, fields::method(obj)?)
        .maybe_id(fields::id(obj)?)
        .alt_spec(alt_spec);
    if let Some(params) = params {
        builder = builder.params(params);
    }
    if let Some(kwparams) = kwparams {
        builder = builder.kwparams(kwparams);
    }
    builder.build()
}

pub(crate) fn deflate_return(ret: &Return) -> Result<Value> {
    Ok(serde_json::to_value(WireReturn {
        version: Version::V1_1,
        id: ret.id(),
        result: ret.result(),
        error: ret.error().map(WireError::from),
    })?)
}

pub(crate) fn inflate_return(obj: &Map<String, Value>) -> Result<Return> {
    let id = fields::id(obj)?;
    let outcome = super::strict_outcome(obj, &["error", "data"])?;
    Ok(Return::new(Version::V1_1, id, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_alt_spec_deflates_kwparams() {
        let call = inflate_call(
            &obj(json!({"version": "1.1", "method": "m", "kwparams": {"a": 1}, "id": 1})),
            false,
        )
        .unwrap();
        assert!(call.alt_spec());
        assert_eq!(
            deflate_call(&call).unwrap(),
            json!({"version": "1.1", "method": "m", "kwparams": {"a": 1}, "id": 1})
        );
    }

    #[test]
    fn test_plain_named_params_stay_under_params() {
        let call = inflate_call(
            &obj(json!({"version": "1.1", "method": "m", "params": {"a": 1}, "id": 1})),
            false,
        )
        .unwrap();
        assert!(!call.alt_spec());
        assert_eq!(deflate_call(&call).unwrap()["params"], json!({"a": 1}));
    }

    #[test]
    fn test_forced_alt_spec() {
        let call = inflate_call(
            &obj(json!({"version": "1.1", "method": "m", "params": {"a": 1}, "id": 1})),
            true,
        )
        .unwrap();
        assert!(call.alt_spec());
        assert!(deflate_call(&call).unwrap().get("params").is_none());
    }

    #[test]
    fn test_conflicting_params() {
        let result = inflate_call(
            &obj(json!({"method": "m", "params": [1], "kwparams": {"a": 1}})),
            false,
        );
        assert!(matches!(result, Err(MarshalError::ConflictingParams)));
    }

    #[test]
    fn test_kwparams_must_be_object() {
        let result = inflate_call(&obj(json!({"method": "m", "kwparams": [1]})), false);
        assert!(matches!(
            result,
            Err(MarshalError::MalformedField { field: "kwparams", .. })
        ));
    }

    #[test]
    fn test_error_shape() {
        let ret = Return::failure(
            Version::V1_1,
            Some("x".into()),
            ErrorObject::with_code(123, "broken", Some(json!({"why": "because"}))),
        );
        assert_eq!(
            deflate_return(&ret).unwrap(),
            json!({
                "version": "1.1",
                "id": "x",
                "error": {
                    "name": "JSONRPCError",
                    "code": 123,
                    "message": "broken",
                    "error": {"why": "because"}
                }
            })
        );
    }

    #[test]
    fn test_inflate_error_reads_data_alias() {
        let ret = inflate_return(&obj(json!({
            "version": "1.1",
            "id": 1,
            "error": {"code": 1, "message": "m", "data": [2]}
        })))
        .unwrap();
        assert_eq!(ret.error().unwrap().data, Some(json!([2])));
    }
}
