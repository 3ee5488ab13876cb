//! Response marshalling: returns to HTTP responses and back.

use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderValue, Response, StatusCode};
use jsonrpc_dialects::error_codes::TRANSPORT_ERROR;
use jsonrpc_dialects::registry;
use jsonrpc_dialects::{ErrorObject, MarshalError, Outcome, Return};
use serde_json::Value;
use tracing::{debug, warn};

use crate::Result;
use crate::binding::HttpBinding;
use crate::sink::{ResponseSink, Setter};

fn reason(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => reason.to_string(),
        None => format!("HTTP status {}", status.as_u16()),
    }
}

impl HttpBinding {
    /// Reads a return from an HTTP response. Non-2xx responses always come
    /// back as an error return, see [`HttpBinding::response_to_result_error`].
    pub fn response_to_result(&self, response: &Response<Bytes>) -> Result<Return> {
        if !response.status().is_success() {
            return Ok(self.response_to_result_error(response));
        }
        let payload: Value = serde_json::from_slice(response.body())?;
        Ok(registry::inflate_return(&payload)?)
    }

    /// Best-effort return for a failed HTTP response.
    ///
    /// A decoded error keeps its code and takes the response status. A body
    /// without an error gets a transport error in its place, and an
    /// undecodable body yields a fresh error return of the configured
    /// default version.
    pub fn response_to_result_error(&self, response: &Response<Bytes>) -> Return {
        let status = response.status();
        let decoded = serde_json::from_slice::<Value>(response.body())
            .map_err(MarshalError::from)
            .and_then(|payload| registry::inflate_return(&payload));

        match decoded {
            Ok(ret) => match ret.into_parts() {
                (version, id, Outcome::Error(error)) => {
                    debug!("HTTP {} carried JSON-RPC error {}", status, error.code);
                    Return::failure(version, id, error.with_http_status(status.as_u16()))
                }
                (version, id, outcome) => {
                    warn!("HTTP {} response without a JSON-RPC error", status);
                    let mut ret = Return::new(version, id, outcome);
                    ret.set_error(reason(status), TRANSPORT_ERROR, None).http_status =
                        status.as_u16();
                    ret
                }
            },
            Err(err) => {
                warn!("Undecodable body on HTTP {} response: {}", status, err);
                Return::failure(
                    self.config().default_version,
                    None,
                    ErrorObject::transport(status.as_u16(), reason(status)),
                )
            }
        }
    }

    /// Builds an HTTP response carrying `ret`.
    pub fn result_to_response(&self, ret: &Return) -> Result<Response<Bytes>> {
        let mut response = Response::new(Bytes::new());
        self.write_result_to_response(ret, &mut response)?;
        Ok(response)
    }

    /// Writes `ret` onto any response sink: status from the error's HTTP
    /// status (200 without an error), content type by revision, JSON body.
    ///
    /// Fails before writing anything when the sink lacks one of the setters.
    pub fn write_result_to_response<S>(&self, ret: &Return, sink: &mut S) -> Result<()>
    where
        S: ResponseSink + ?Sized,
    {
        let status = ret.error().map_or(200, |error| error.http_status);
        let status = StatusCode::from_u16(status).map_err(http::Error::from)?;
        let content_type = HeaderValue::from_str(self.content_type(ret.version()))
            .map_err(http::Error::from)?;
        let body = serde_json::to_vec(&ret.deflate()?)?;

        sink.require(&Setter::ALL)?;
        debug!("Sending JSON-RPC response: status={}", status);
        sink.set_status(status)?;
        sink.set_header(CONTENT_TYPE, content_type)?;
        sink.set_header(CONTENT_LENGTH, HeaderValue::from(body.len()))?;
        sink.set_body(Bytes::from(body))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonrpc_dialects::{RequestId, Version};
    use serde_json::json;

    fn response(status: u16, body: &'static [u8]) -> Response<Bytes> {
        Response::builder()
            .status(status)
            .body(Bytes::from_static(body))
            .unwrap()
    }

    #[test]
    fn test_success_response() {
        let binding = HttpBinding::default();
        let ret = binding
            .response_to_result(&response(200, br#"{"jsonrpc":"2.0","id":1,"result":3}"#))
            .unwrap();
        assert_eq!(ret.result(), Some(&json!(3)));
        assert_eq!(ret.id(), Some(&RequestId::from(1i64)));
    }

    #[test]
    fn test_success_with_bad_body_fails() {
        let binding = HttpBinding::default();
        assert!(binding.response_to_result(&response(200, b"<html>")).is_err());
    }

    #[test]
    fn test_error_body_takes_response_status() {
        let binding = HttpBinding::default();
        let ret = binding
            .response_to_result(&response(
                503,
                br#"{"jsonrpc":"2.0","id":1,"error":{"code":-32603,"message":"Internal error"}}"#,
            ))
            .unwrap();
        let error = ret.error().unwrap();
        assert_eq!(error.code, -32603);
        assert_eq!(error.http_status, 503);
    }

    #[test]
    fn test_missing_error_is_synthesized() {
        let binding = HttpBinding::default();
        let ret = binding
            .response_to_result(&response(502, br#"{"version":"1.1","id":"a","result":"partial"}"#))
            .unwrap();
        assert_eq!(ret.version(), Version::V1_1);
        assert_eq!(ret.id(), Some(&RequestId::from("a")));
        let error = ret.error().unwrap();
        assert_eq!(error.code, TRANSPORT_ERROR);
        assert_eq!(error.message, "Bad Gateway");
        assert_eq!(error.http_status, 502);
    }

    #[test]
    fn test_undecodable_error_body() {
        let binding = HttpBinding::builder().default_version(Version::V1_1).build();
        let ret = binding
            .response_to_result(&response(500, b"upstream exploded"))
            .unwrap();
        assert!(ret.has_error());
        assert_eq!(ret.version(), Version::V1_1);
        assert_eq!(ret.id(), None);
        assert_eq!(ret.error().unwrap().http_status, 500);
    }

    #[test]
    fn test_result_to_response() {
        let binding = HttpBinding::default();
        let ret = Return::success(Version::V2_0, Some(RequestId::from(1i64)), json!("ok"));
        let response = binding.result_to_response(&ret).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json-rpc");
        assert_eq!(
            response.headers()[CONTENT_LENGTH],
            response.body().len().to_string().as_str()
        );
        let body: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body, json!({"jsonrpc": "2.0", "id": 1, "result": "ok"}));
    }

    #[test]
    fn test_error_status_round_trip() {
        let binding = HttpBinding::default();
        let ret = Return::failure(
            Version::V2_0,
            Some(RequestId::from(9i64)),
            ErrorObject::method_not_found("nope"),
        );
        let response = binding.result_to_response(&ret).unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(binding.response_to_result(&response).unwrap(), ret);
    }

    #[test]
    fn test_invalid_status_is_http_error() {
        let binding = HttpBinding::default();
        let mut error = ErrorObject::internal_error(None);
        error.http_status = 42;
        let ret = Return::failure(Version::V2_0, None, error);
        assert!(matches!(
            binding.result_to_response(&ret),
            Err(crate::HttpBindingError::Http(_))
        ));
    }

    #[derive(Default)]
    struct StatusOnly(Option<StatusCode>);

    impl ResponseSink for StatusOnly {
        fn supports(&self, setter: Setter) -> bool {
            setter == Setter::Status
        }

        fn set_status(&mut self, status: StatusCode) -> Result<()> {
            self.0 = Some(status);
            Ok(())
        }
    }

    #[test]
    fn test_unsupported_setter_leaves_sink_untouched() {
        let binding = HttpBinding::default();
        let ret = Return::success(Version::V2_0, Some(RequestId::from(1i64)), json!(1));
        let mut sink = StatusOnly::default();
        assert!(matches!(
            binding.write_result_to_response(&ret, &mut sink),
            Err(crate::HttpBindingError::ResponseWriteFailure("header"))
        ));
        assert_eq!(sink.0, None);
    }
}
