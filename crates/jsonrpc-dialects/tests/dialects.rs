//! End-to-end marshalling across every supported revision
//!
//! Each test feeds wire payloads through the public registry and checks the
//! canonical values and the wire shapes that come back out.

use jsonrpc_dialects::prelude::*;
use jsonrpc_dialects::{inflate, inflate_as, registry};
use serde_json::{Value, json};

fn round_trip(message: Message) {
    let wire = message.deflate().unwrap();
    let again = inflate(&wire).unwrap();
    assert_eq!(again, message, "round trip changed {}", wire);
}

#[test]
fn test_v2_request_is_not_a_notification() {
    let _ = tracing_subscriber::fmt::try_init();

    let call = registry::inflate_call(&json!({
        "jsonrpc": "2.0", "method": "add", "params": [1, 2], "id": 7
    }))
    .unwrap();
    assert_eq!(call.version(), Version::V2_0);
    assert_eq!(call.method(), "add");
    assert_eq!(call.params(), Some(&Params::Positional(vec![json!(1), json!(2)])));
    assert_eq!(call.id(), Some(&RequestId::from(7i64)));
    assert!(!call.is_notification());
}

#[test]
fn test_bare_v1_call_without_id_is_notification() {
    let call = registry::inflate_call(&json!({"method": "add", "params": [1, 2]})).unwrap();
    assert_eq!(call.version(), Version::V1_0);
    assert!(call.is_notification());

    // 1.0 writes the null id back out
    assert_eq!(
        call.deflate().unwrap(),
        json!({"method": "add", "params": [1, 2], "id": null})
    );
}

#[test]
fn test_v1_1_calls_are_never_notifications() {
    let call = registry::inflate_call(&json!({"version": "1.1", "method": "ping"})).unwrap();
    assert_eq!(call.version(), Version::V1_1);
    assert!(!call.is_notification());
}

#[test]
fn test_alt_spec_named_params_become_kwparams() {
    let call = Call::builder(Version::V1_1, "m")
        .params(json!({"a": 1}).as_object().cloned().unwrap())
        .id(1i64)
        .alt_spec(true)
        .build()
        .unwrap();
    assert_eq!(
        call.deflate().unwrap(),
        json!({"version": "1.1", "method": "m", "kwparams": {"a": 1}, "id": 1})
    );

    // positional params keep the plain field even on the alt-spec dialect
    let call = Call::builder(Version::V1_1, "m")
        .params(vec![json!(1)])
        .id(1i64)
        .alt_spec(true)
        .build()
        .unwrap();
    let wire = call.deflate().unwrap();
    assert!(wire.get("kwparams").is_none());
    assert_eq!(wire["params"], json!([1]));
}

#[test]
fn test_jsonrpc_marker_beats_version() {
    let call = registry::inflate_call(&json!({
        "jsonrpc": "2.0", "version": "1.1", "method": "m", "id": 1
    }))
    .unwrap();
    assert_eq!(call.version(), Version::V2_0);
}

#[test]
fn test_unknown_version_is_rejected() {
    let err = inflate(&json!({"jsonrpc": "3.0", "method": "m"})).unwrap_err();
    assert!(matches!(err, MarshalError::UnsupportedVersion(ref tag) if tag == "3.0"));
}

#[test]
fn test_conflicting_params() {
    let err = registry::inflate_call(&json!({
        "version": "1.1", "method": "m", "params": [1], "kwparams": {"a": 1}, "id": 1
    }))
    .unwrap_err();
    assert!(matches!(err, MarshalError::ConflictingParams));
}

#[test]
fn test_v2_return_with_both_outcomes_is_malformed() {
    let err = registry::inflate_return(&json!({
        "jsonrpc": "2.0", "id": 1, "result": 1,
        "error": {"code": -32603, "message": "Internal error"}
    }))
    .unwrap_err();
    assert!(matches!(err, MarshalError::MalformedField { .. }));
}

#[test]
fn test_v1_0_error_is_lenient() {
    let ret = registry::inflate_return(&json!({"id": 1, "result": null, "error": "boom"})).unwrap();
    let error = ret.error().unwrap();
    assert_eq!(error.message, "boom");
    assert_eq!(error.kind(), Some(ErrorCode::InternalError));
}

#[test]
fn test_round_trip_every_revision() {
    let named = json!({"a": 1, "b": [true, null]}).as_object().cloned().unwrap();
    for version in Version::ALL {
        let params = if version == Version::V1_0 {
            Params::Positional(vec![json!("x"), json!({"y": 2})])
        } else {
            Params::Named(named.clone())
        };
        let call = Call::new(version, "do.thing", Some(params), Some(RequestId::from("req-1")))
            .unwrap();
        round_trip(call.clone().into());

        round_trip(Return::for_call(&call, json!({"ok": true})).into());
        round_trip(
            Return::error_for_call(
                &call,
                ErrorObject::server_error(-32010, "quota", Some(json!({"limit": 5}))),
            )
            .into(),
        );
    }

    let alt = Call::builder(Version::V1_1, "m")
        .kwparams(named)
        .id(2i64)
        .alt_spec(true)
        .build()
        .unwrap();
    let wire = alt.deflate().unwrap();
    let again = inflate_as(MessageKind::Call, Dialect::alt_spec(), &wire).unwrap();
    assert_eq!(again, Message::Call(alt));
}

#[test]
fn test_error_round_trip_keeps_http_status_mapping() {
    let ret = Return::failure(
        Version::V2_0,
        Some(RequestId::from(3i64)),
        ErrorObject::method_not_found("missing"),
    );
    let wire: Value = serde_json::from_str(&ret.to_json_string().unwrap()).unwrap();
    let again = registry::inflate_return(&wire).unwrap();
    assert_eq!(again.error().unwrap().http_status, 404);
    assert_eq!(again, ret);
}
