//! JSON-RPC 1.0: positional params only, `id: null` marks a notification,
//! no version marker, loosely typed errors.

use serde::Serialize;
use serde_json::{Map, Value};

use super::fields::{self, ErrorBody};
use crate::error::{MarshalError, Result};
use crate::request::{Call, Params};
use crate::response::{Outcome, Return};
use crate::types::{RequestId, Version};

#[derive(Serialize)]
struct WireCall<'a> {
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<&'a Params>,
    id: Option<&'a RequestId>,
}

#[derive(Serialize)]
struct WireReturn<'a> {
    id: Option<&'a RequestId>,
    result: Option<&'a Value>,
    error: Option<ErrorBody<'a>>,
}

pub(crate) fn deflate_call(call: &Call) -> Result<Value> {
    Ok(serde_json::to_value(WireCall {
        method: call.method(),
        params: call.params(),
        id: call.id(),
    })?)
}

pub(crate) fn inflate_call(obj: &Map<String, Value>) -> Result<Call> {
    let mut builder = Call::builder(Version::V1_0, fields::method(obj)?)
        .maybe_id(fields::id(obj)?);
    if let Some(params) = fields::params(obj, "params", false)? {
        builder = builder.params(params);
    }
    builder.build()
}

pub(crate) fn deflate_return(ret: &Return) -> Result<Value> {
    Ok(serde_json::to_value(WireReturn {
        id: ret.id(),
        result: ret.result(),
        error: ret.error().map(ErrorBody::from),
    })?)
}

pub(crate) fn inflate_return(obj: &Map<String, Value>) -> Result<Return> {
    let id = fields::id(obj)?;
    let outcome = if let Some(error) = fields::present(obj, "error") {
        Outcome::Error(fields::loose_error(error))
    } else if let Some(result) = obj.get("result") {
        Outcome::Result(result.clone())
    } else {
        return Err(MarshalError::malformed(
            "result",
            "a return needs a result or an error",
        ));
    };
    Ok(Return::new(Version::V1_0, id, outcome))
}
