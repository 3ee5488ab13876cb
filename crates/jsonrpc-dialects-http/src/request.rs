//! Request marshalling: HTTP requests to calls and back.
//!
//! Three GET shapes are understood besides POST:
//!
//! - encoded: `GET /?method=m&id=1&params=<json or base64 json>`
//! - query: `GET /?method=m&id=1&a=1&b=2`
//! - REST: `GET /m?id=1&a=1&b=2`

use std::borrow::Cow;

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE};
use http::uri::PathAndQuery;
use http::{Method, Request, Uri};
use jsonrpc_dialects::registry;
use jsonrpc_dialects::{Call, Dialect, MarshalError, Params, RequestId, Version};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::binding::{HttpBinding, RequestOptions};
use crate::query::{self, QueryParams, decode_component, decode_value, encode_value};
use crate::{HttpBindingError, Result};

/// Query keys the binding itself reads on inbound GET
const RESERVED_KEYS: [&str; 5] = ["jsonrpc", "version", "method", "id", "params"];

fn get_not_supported(version: Version) -> HttpBindingError {
    HttpBindingError::ProtocolViolation(format!(
        "JSON-RPC {} does not support GET",
        version.as_str()
    ))
}

fn version_marker(version: Version) -> (&'static str, Cow<'static, str>) {
    match version {
        Version::V2_0 => ("jsonrpc", Cow::Borrowed(version.as_str())),
        Version::V1_0 | Version::V1_1 => ("version", Cow::Borrowed(version.as_str())),
    }
}

fn params_from_value(value: Value) -> Result<Option<Params>> {
    match value {
        Value::Null => Ok(None),
        other => Params::from_value(other)
            .map(Some)
            .ok_or_else(|| MarshalError::malformed("params", "must be an array or object").into()),
    }
}

/// `params` of an encoded GET: JSON text, or base64 of JSON text.
fn decode_encoded_params(raw: &str) -> Result<Value> {
    if let Ok(value) = serde_json::from_str(raw) {
        return Ok(value);
    }
    // an unescaped '+' from the standard alphabet arrives as a space
    let restored = raw.replace(' ', "+");
    let bytes = STANDARD
        .decode(&restored)
        .or_else(|_| URL_SAFE.decode(&restored))
        .map_err(|err| {
            MarshalError::malformed("params", format!("neither JSON nor base64: {}", err))
        })?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Keys exactly `0..n`, the shape query-style GET reads as positional params.
fn is_sequence(map: &Map<String, Value>) -> bool {
    !map.is_empty() && (0..map.len()).all(|i| map.contains_key(&i.to_string()))
}

fn into_params(map: Map<String, Value>) -> Option<Params> {
    if map.is_empty() {
        return None;
    }
    if is_sequence(&map) {
        let mut map = map;
        let items = (0..map.len())
            .filter_map(|i| map.remove(&i.to_string()))
            .collect();
        Some(Params::Positional(items))
    } else {
        Some(Params::Named(map))
    }
}

/// Appends `query` to the target's query string and, for REST style,
/// `segment` to its path.
fn build_target(base: &str, segment: Option<&str>, query: &str) -> Result<Uri> {
    let base: Uri = base.parse().map_err(http::Error::from)?;
    let base_path = match base.path() {
        "" => "/",
        path => path,
    };
    let path = match segment {
        Some(segment) => format!(
            "{}/{}",
            base_path.trim_end_matches('/'),
            urlencoding::encode(segment)
        ),
        None => base_path.to_string(),
    };
    let path_and_query = match base.query().filter(|existing| !existing.is_empty()) {
        Some(existing) => format!("{}?{}&{}", path, existing, query),
        None => format!("{}?{}", path, query),
    };

    let mut parts = base.into_parts();
    parts.path_and_query = Some(
        path_and_query
            .parse::<PathAndQuery>()
            .map_err(http::Error::from)?,
    );
    Uri::from_parts(parts).map_err(|err| HttpBindingError::Http(err.into()))
}

impl HttpBinding {
    /// Reads a call from an inbound HTTP request.
    pub fn request_to_call(&self, request: &Request<Bytes>) -> Result<Call> {
        let method = request.method();
        if method == Method::POST {
            self.post_to_call(request.body())
        } else if method == Method::GET {
            self.get_to_call(request.uri())
        } else {
            Err(HttpBindingError::UnsupportedTransportMethod(
                method.to_string(),
            ))
        }
    }

    fn post_to_call(&self, body: &Bytes) -> Result<Call> {
        trace!("Received JSON-RPC POST body: {}", String::from_utf8_lossy(body));
        let payload: Value = serde_json::from_slice(body)?;
        let call = registry::inflate_call(&payload)?;
        debug!(
            "Decoded POST call: method={} version={}",
            call.method(),
            call.version()
        );
        Ok(call)
    }

    fn get_to_call(&self, uri: &Uri) -> Result<Call> {
        let mut query = QueryParams::parse(uri.query());
        let jsonrpc = query.take("jsonrpc");
        let version = query.take("version");
        let encoded = self.config().prefer_encoded_get && query.contains("params");

        let dialect = match jsonrpc.or(version) {
            Some(tag) => Dialect::parse(&tag)?,
            None if encoded => Dialect::new(Version::V2_0),
            None => Dialect::new(Version::V1_1),
        };
        trace!("Resolved GET dialect: {}", dialect);
        if !dialect.version.supports_get() {
            return Err(get_not_supported(dialect.version));
        }

        let method = match query.take("method") {
            Some(method) => method,
            None if self.config().rest_style_methods => self
                .rest_method(uri.path())
                .ok_or_else(|| MarshalError::malformed("method", "missing from query and path"))?,
            None => return Err(MarshalError::malformed("method", "missing from query").into()),
        };

        let id = match query.take("id") {
            Some(raw) => RequestId::from_value(&decode_value(&raw))?,
            None => None,
        };

        let params = if encoded {
            debug!("Decoding encoded GET call: method={}", method);
            match query.take("params") {
                Some(raw) => params_from_value(decode_encoded_params(&raw)?)?,
                None => None,
            }
        } else {
            debug!("Decoding query GET call: method={}", method);
            let flat = query.into_map();
            if self.config().expand_params && !flat.is_empty() {
                params_from_value(self.config().expander.expand(&flat))?
            } else {
                into_params(flat)
            }
        };

        let mut builder = Call::builder(dialect.version, method)
            .maybe_id(id)
            .alt_spec(dialect.alt_spec);
        if let Some(params) = params {
            builder = builder.params(params);
        }
        Ok(builder.build()?)
    }

    /// Last non-empty path segment below the endpoint.
    fn rest_method(&self, path: &str) -> Option<String> {
        let endpoint = self.config().endpoint.trim_end_matches('/');
        let below = path.strip_prefix(endpoint).unwrap_or(path);
        below
            .split('/')
            .filter(|segment| !segment.is_empty())
            .last()
            .map(decode_component)
    }

    /// Builds the outbound HTTP request carrying `call`.
    pub fn call_to_request(&self, call: &Call, options: &RequestOptions) -> Result<Request<Bytes>> {
        let uri = options.uri.as_deref().unwrap_or(&self.config().endpoint);
        let content_type = options
            .content_type
            .as_deref()
            .unwrap_or_else(|| self.content_type(call.version()));

        if !options.prefer_get.unwrap_or(self.config().prefer_get) {
            let body = serde_json::to_vec(&call.deflate()?)?;
            debug!("Encoding POST call: method={}", call.method());
            let request = Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(CONTENT_TYPE, content_type)
                .header(ACCEPT, content_type)
                .header(CONTENT_LENGTH, body.len().to_string())
                .body(Bytes::from(body))?;
            return Ok(request);
        }

        let version = call.version();
        if !version.supports_get() {
            return Err(get_not_supported(version));
        }
        let encoded = options
            .encoded
            .unwrap_or_else(|| self.config().encoded_get_for(version));
        let rest = self.config().rest_style_methods;

        let id = call.id().map(RequestId::to_value);
        let flat = match (encoded, call.params()) {
            (false, Some(params)) => self.flatten_params(params)?,
            _ => Map::new(),
        };

        let mut pairs = vec![version_marker(version)];
        if !rest {
            pairs.push(("method", Cow::Borrowed(call.method())));
        }
        if let Some(id) = &id {
            pairs.push(("id", encode_value(id)));
        }
        if encoded {
            if let Some(params) = call.params() {
                let json = serde_json::to_vec(&params.to_value())?;
                pairs.push(("params", Cow::Owned(STANDARD.encode(json))));
            }
        } else {
            pairs.extend(flat.iter().map(|(key, value)| (key.as_str(), encode_value(value))));
        }

        let segment = rest.then(|| call.method());
        let target = build_target(uri, segment, &query::build(pairs))?;
        debug!(
            "Encoding {} GET call: {}",
            if encoded { "encoded" } else { "query" },
            target
        );

        let request = Request::builder()
            .method(Method::GET)
            .uri(target)
            .header(ACCEPT, content_type)
            .body(Bytes::new())?;
        Ok(request)
    }

    fn flatten_params(&self, params: &Params) -> Result<Map<String, Value>> {
        if matches!(params, Params::Named(map) if is_sequence(map)) {
            return Err(HttpBindingError::ProtocolViolation(
                "named params keyed 0..n would read back as positional".to_string(),
            ));
        }
        let flat = if self.config().expand_params {
            self.config().expander.collapse(&params.to_value())
        } else {
            match params {
                Params::Named(map) => map.clone(),
                Params::Positional(items) => items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| (i.to_string(), item.clone()))
                    .collect(),
            }
        };
        if let Some(key) = flat.keys().find(|key| RESERVED_KEYS.contains(&key.as_str())) {
            return Err(HttpBindingError::ProtocolViolation(format!(
                "parameter '{}' collides with a reserved query key",
                key
            )));
        }
        Ok(flat)
    }
}
