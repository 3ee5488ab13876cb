//! JSON-RPC 2.0: `jsonrpc: "2.0"` marker, notifications omit `id`.

use serde::Serialize;
use serde_json::{Map, Value};

use super::fields::{self, ErrorBody};
use crate::error::Result;
use crate::request::{Call, Params};
use crate::response::Return;
use crate::types::{RequestId, Version};

#[derive(Serialize)]
struct WireCall<'a> {
    jsonrpc: Version,
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<&'a Params>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a RequestId>,
}

#[derive(Serialize)]
struct WireReturn<'a> {
    jsonrpc: Version,
    id: Option<&'a RequestId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody<'a>>,
}

pub(crate) fn deflate_call(call: &Call) -> Result<Value> {
    Ok(serde_json::to_value(WireCall {
        jsonrpc: Version::V2_0,
        method: call.method(),
        params: call.params(),
        id: call.id(),
    })?)
}

pub(crate) fn inflate_call(obj: &Map<String, Value>) -> Result<Call> {
    let mut builder = Call::builder(Version::V2_0, fields::method(obj)?)
        .maybe_id(fields::id(obj)?);
    if let Some(params) = fields::params(obj, "params", true)? {
        builder = builder.params(params);
    }
    builder.build()
}

pub(crate) fn deflate_return(ret: &Return) -> Result<Value> {
    Ok(serde_json::to_value(WireReturn {
        jsonrpc: Version::V2_0,
        id: ret.id(),
        result: ret.result(),
        error: ret.error().map(ErrorBody::from),
    })?)
}

pub(crate) fn inflate_return(obj: &Map<String, Value>) -> Result<Return> {
    let id = fields::id(obj)?;
    let outcome = super::strict_outcome(obj, &["data"])?;
    Ok(Return::new(Version::V2_0, id, outcome))
}
