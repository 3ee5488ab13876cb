//! Version registry and dispatcher.
//!
//! Works out which revision and which kind of message produced a decoded
//! payload, then hands the payload to that revision's codec.

use serde_json::{Map, Value};
use tracing::trace;

use crate::codec;
use crate::error::{MarshalError, Result};
use crate::request::Call;
use crate::response::Return;
use crate::types::{Dialect, RequestId, Version};

/// Whether a payload is a request or a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Call,
    Return,
}

/// A decoded message of either kind
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Call(Call),
    Return(Return),
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Call(_) => MessageKind::Call,
            Message::Return(_) => MessageKind::Return,
        }
    }

    pub fn version(&self) -> Version {
        match self {
            Message::Call(call) => call.version(),
            Message::Return(ret) => ret.version(),
        }
    }

    pub fn id(&self) -> Option<&RequestId> {
        match self {
            Message::Call(call) => call.id(),
            Message::Return(ret) => ret.id(),
        }
    }

    pub fn deflate(&self) -> Result<Value> {
        match self {
            Message::Call(call) => call.deflate(),
            Message::Return(ret) => ret.deflate(),
        }
    }

    pub fn into_call(self) -> Option<Call> {
        match self {
            Message::Call(call) => Some(call),
            Message::Return(_) => None,
        }
    }

    pub fn into_return(self) -> Option<Return> {
        match self {
            Message::Return(ret) => Some(ret),
            Message::Call(_) => None,
        }
    }
}

impl From<Call> for Message {
    fn from(call: Call) -> Self {
        Message::Call(call)
    }
}

impl From<Return> for Message {
    fn from(ret: Return) -> Self {
        Message::Return(ret)
    }
}

fn as_object(payload: &Value) -> Result<&Map<String, Value>> {
    payload
        .as_object()
        .ok_or_else(|| MarshalError::malformed("payload", "must be a JSON object"))
}

fn version_tag(tag: &Value) -> Result<Version> {
    match tag {
        Value::String(s) => {
            Version::parse(s).ok_or_else(|| MarshalError::UnsupportedVersion(s.clone()))
        }
        other => Err(MarshalError::UnsupportedVersion(other.to_string())),
    }
}

/// Revision of a payload: `jsonrpc` wins over `version`, and neither means 1.0.
pub fn resolve_version(payload: &Map<String, Value>) -> Result<Version> {
    if let Some(tag) = payload.get("jsonrpc") {
        version_tag(tag)
    } else if let Some(tag) = payload.get("version") {
        version_tag(tag)
    } else {
        Ok(Version::V1_0)
    }
}

/// Call if the payload names a method, Return if it carries an id or an outcome.
pub fn classify(payload: &Map<String, Value>) -> Result<MessageKind> {
    if payload.contains_key("method") {
        Ok(MessageKind::Call)
    } else if ["id", "result", "error"]
        .iter()
        .any(|key| payload.contains_key(*key))
    {
        Ok(MessageKind::Return)
    } else {
        Err(MarshalError::AmbiguousMessageKind)
    }
}

fn dispatch(kind: MessageKind, dialect: Dialect, obj: &Map<String, Value>) -> Result<Message> {
    trace!(?kind, %dialect, "inflating payload");
    match kind {
        MessageKind::Call => codec::inflate_call(dialect, obj).map(Message::Call),
        MessageKind::Return => codec::inflate_return(dialect.version, obj).map(Message::Return),
    }
}

/// Inflate a payload of unknown kind and revision.
pub fn inflate(payload: &Value) -> Result<Message> {
    let obj = as_object(payload)?;
    let version = resolve_version(obj)?;
    let kind = classify(obj)?;
    dispatch(kind, Dialect::new(version), obj)
}

/// Inflate a payload known to be a call.
pub fn inflate_call(payload: &Value) -> Result<Call> {
    let obj = as_object(payload)?;
    let version = resolve_version(obj)?;
    codec::inflate_call(Dialect::new(version), obj)
}

/// Inflate a payload known to be a return.
pub fn inflate_return(payload: &Value) -> Result<Return> {
    let obj = as_object(payload)?;
    let version = resolve_version(obj)?;
    codec::inflate_return(version, obj)
}

/// Inflate with an explicit kind and dialect, ignoring any marker in the payload.
pub fn inflate_as(kind: MessageKind, dialect: Dialect, payload: &Value) -> Result<Message> {
    dispatch(kind, dialect, as_object(payload)?)
}

/// Decode JSON text and inflate it.
pub fn inflate_str(text: &str) -> Result<Message> {
    let payload: Value = serde_json::from_str(text)?;
    inflate(&payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_resolve_version_precedence() {
        assert_eq!(
            resolve_version(&obj(json!({"jsonrpc": "2.0", "version": "1.1"}))).unwrap(),
            Version::V2_0
        );
        assert_eq!(
            resolve_version(&obj(json!({"version": "1.1"}))).unwrap(),
            Version::V1_1
        );
        assert_eq!(resolve_version(&obj(json!({}))).unwrap(), Version::V1_0);
    }

    #[test]
    fn test_resolve_version_rejects_unknown_tags() {
        match resolve_version(&obj(json!({"jsonrpc": "3.0"}))) {
            Err(MarshalError::UnsupportedVersion(tag)) => assert_eq!(tag, "3.0"),
            other => panic!("expected UnsupportedVersion, got {:?}", other),
        }
        match resolve_version(&obj(json!({"version": 1.1}))) {
            Err(MarshalError::UnsupportedVersion(tag)) => assert_eq!(tag, "1.1"),
            other => panic!("expected UnsupportedVersion, got {:?}", other),
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(&obj(json!({"method": "m"}))).unwrap(), MessageKind::Call);
        assert_eq!(classify(&obj(json!({"id": 1}))).unwrap(), MessageKind::Return);
        assert_eq!(classify(&obj(json!({"result": 1}))).unwrap(), MessageKind::Return);
        assert!(matches!(
            classify(&obj(json!({"params": []}))),
            Err(MarshalError::AmbiguousMessageKind)
        ));
    }

    #[test]
    fn test_inflate_v2_request() {
        let message = inflate(&json!({"jsonrpc": "2.0", "method": "add", "params": [1, 2], "id": 7}))
            .unwrap();
        let call = message.into_call().unwrap();
        assert_eq!(call.version(), Version::V2_0);
        assert_eq!(call.method(), "add");
        assert_eq!(call.get_param_index(0), Some(&json!(1)));
        assert_eq!(call.id(), Some(&RequestId::from(7i64)));
        assert!(!call.is_notification());
    }

    #[test]
    fn test_inflate_v1_notification() {
        let call = inflate(&json!({"method": "add", "params": [1, 2]}))
            .unwrap()
            .into_call()
            .unwrap();
        assert_eq!(call.version(), Version::V1_0);
        assert!(call.is_notification());
    }

    #[test]
    fn test_inflate_return() {
        let message = inflate(&json!({"jsonrpc": "2.0", "id": 1, "result": "ok"})).unwrap();
        assert_eq!(message.kind(), MessageKind::Return);
        assert_eq!(message.version(), Version::V2_0);
        assert_eq!(message.id(), Some(&RequestId::from(1i64)));
    }

    #[test]
    fn test_inflate_as_alt_spec() {
        let message = inflate_as(
            MessageKind::Call,
            Dialect::parse("1.1-alt").unwrap(),
            &json!({"method": "m", "params": {"a": 1}, "id": 1}),
        )
        .unwrap();
        let wire = message.deflate().unwrap();
        assert_eq!(
            wire,
            json!({"version": "1.1", "method": "m", "kwparams": {"a": 1}, "id": 1})
        );
    }

    #[test]
    fn test_non_object_payload() {
        assert!(matches!(
            inflate(&json!([1, 2])),
            Err(MarshalError::MalformedField { field: "payload", .. })
        ));
    }

    #[test]
    fn test_inflate_str() {
        let message = inflate_str(r#"{"version":"1.1","method":"m","kwparams":{"a":1},"id":1}"#)
            .unwrap();
        assert!(message.into_call().unwrap().alt_spec());

        assert!(matches!(inflate_str("{not json"), Err(MarshalError::Json(_))));
    }
}
