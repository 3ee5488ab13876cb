//! Per-revision wire codecs.
//!
//! The revisions disagree on field names and semantics, so each one has its
//! own module; the functions here only pick the module for a version.

mod fields;
mod v1_0;
mod v1_1;
mod v2_0;

use serde_json::{Map, Value};

use crate::error::{MarshalError, Result};
use crate::request::Call;
use crate::response::{Outcome, Return};
use crate::types::{Dialect, Version};

pub(crate) fn deflate_call(call: &Call) -> Result<Value> {
    match call.version() {
        Version::V1_0 => v1_0::deflate_call(call),
        Version::V1_1 => v1_1::deflate_call(call),
        Version::V2_0 => v2_0::deflate_call(call),
    }
}

pub(crate) fn deflate_return(ret: &Return) -> Result<Value> {
    match ret.version() {
        Version::V1_0 => v1_0::deflate_return(ret),
        Version::V1_1 => v1_1::deflate_return(ret),
        Version::V2_0 => v2_0::deflate_return(ret),
    }
}

pub(crate) fn inflate_call(dialect: Dialect, obj: &Map<String, Value>) -> Result<Call> {
    match dialect.version {
        Version::V1_0 => v1_0::inflate_call(obj),
        Version::V1_1 => v1_1::inflate_call(obj, dialect.alt_spec),
        Version::V2_0 => v2_0::inflate_call(obj),
    }
}

pub(crate) fn inflate_return(version: Version, obj: &Map<String, Value>) -> Result<Return> {
    match version {
        Version::V1_0 => v1_0::inflate_return(obj),
        Version::V1_1 => v1_1::inflate_return(obj),
        Version::V2_0 => v2_0::inflate_return(obj),
    }
}

/// Exactly one of a non-null `error` or a `result` member (1.1 and 2.0).
fn strict_outcome(obj: &Map<String, Value>, data_keys: &[&str]) -> Result<Outcome> {
    let result = obj.get("result");
    match fields::present(obj, "error") {
        Some(_) if result.is_some_and(|r| !r.is_null()) => Err(MarshalError::malformed(
            "result",
            "a return cannot carry both a result and an error",
        )),
        Some(error) => Ok(Outcome::Error(fields::strict_error(error, data_keys)?)),
        None => match result {
            Some(result) => Ok(Outcome::Result(result.clone())),
            None => Err(MarshalError::malformed(
                "result",
                "a return needs a result or an error",
            )),
        },
    }
}
