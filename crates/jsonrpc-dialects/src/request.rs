use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::codec;
use crate::error::{MarshalError, Result};
use crate::types::{RequestId, Version};

/// Parameters for a JSON-RPC call
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Params {
    /// Positional parameters as an array
    Positional(Vec<Value>),
    /// Named parameters as an object
    Named(Map<String, Value>),
}

impl Params {
    /// Reads params from a wire value. Only arrays and objects are params.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Array(vec) => Some(Params::Positional(vec)),
            Value::Object(map) => Some(Params::Named(map)),
            _ => None,
        }
    }

    /// Get a parameter by name (for named params)
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Params::Named(map) => map.get(key),
            Params::Positional(_) => None,
        }
    }

    /// Get a parameter by index (for positional params only)
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            Params::Positional(vec) => vec.get(index),
            Params::Named(_) => None,
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Params::Named(_))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Params::Named(map) => map.is_empty(),
            Params::Positional(vec) => vec.is_empty(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Params::Named(map) => map.len(),
            Params::Positional(vec) => vec.len(),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Params::Named(map) => Value::Object(map.clone()),
            Params::Positional(vec) => Value::Array(vec.clone()),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Params::Named(map) => Value::Object(map),
            Params::Positional(vec) => Value::Array(vec),
        }
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Params::Named(map)
    }
}

impl From<Vec<Value>> for Params {
    fn from(vec: Vec<Value>) -> Self {
        Params::Positional(vec)
    }
}

/// A canonical request to invoke a remote procedure, independent of the
/// revision that carried it.
///
/// Calls are immutable once built; use [`Call::builder`] to construct one.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    version: Version,
    method: String,
    params: Option<Params>,
    id: Option<RequestId>,
    alt_spec: bool,
}

impl Call {
    pub fn builder(version: Version, method: impl Into<String>) -> CallBuilder {
        CallBuilder::new(version, method)
    }

    /// Shorthand for a builder with only `params` and `id` set.
    pub fn new(
        version: Version,
        method: impl Into<String>,
        params: Option<Params>,
        id: Option<RequestId>,
    ) -> Result<Self> {
        let mut builder = CallBuilder::new(version, method);
        builder.params = params;
        builder.id = id;
        builder.build()
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> Option<&Params> {
        self.params.as_ref()
    }

    pub fn id(&self) -> Option<&RequestId> {
        self.id.as_ref()
    }

    /// Whether named params go out under `kwparams` (1.1 only)
    pub fn alt_spec(&self) -> bool {
        self.alt_spec
    }

    /// True when no reply is expected. 1.1 has no notifications.
    pub fn is_notification(&self) -> bool {
        self.id.is_none() && self.version.supports_notifications()
    }

    /// Get a parameter by name (if params are named)
    pub fn get_param(&self, name: &str) -> Option<&Value> {
        self.params.as_ref()?.get(name)
    }

    /// Get a parameter by index (if params are positional)
    pub fn get_param_index(&self, index: usize) -> Option<&Value> {
        self.params.as_ref()?.get_index(index)
    }

    /// Wire shape of this call in its own revision.
    pub fn deflate(&self) -> Result<Value> {
        codec::deflate_call(self)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.deflate()?)?)
    }
}

/// Validating constructor for [`Call`].
#[derive(Debug, Clone)]
pub struct CallBuilder {
    version: Version,
    method: String,
    params: Option<Params>,
    kwparams: Option<Map<String, Value>>,
    id: Option<RequestId>,
    alt_spec: bool,
}

impl CallBuilder {
    pub fn new(version: Version, method: impl Into<String>) -> Self {
        Self {
            version,
            method: method.into(),
            params: None,
            kwparams: None,
            id: None,
            alt_spec: false,
        }
    }

    pub fn params(mut self, params: impl Into<Params>) -> Self {
        self.params = Some(params.into());
        self
    }

    /// Named params under the 1.1 alt-spec key. Implies `alt_spec(true)`.
    pub fn kwparams(mut self, kwparams: Map<String, Value>) -> Self {
        self.kwparams = Some(kwparams);
        self
    }

    pub fn id(mut self, id: impl Into<RequestId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn maybe_id(mut self, id: Option<RequestId>) -> Self {
        self.id = id;
        self
    }

    pub fn alt_spec(mut self, alt_spec: bool) -> Self {
        self.alt_spec = alt_spec;
        self
    }

    pub fn build(self) -> Result<Call> {
        if self.method.is_empty() {
            return Err(MarshalError::malformed("method", "must be a non-empty string"));
        }

        let (params, alt_spec) = match (self.params, self.kwparams) {
            (Some(_), Some(_)) => return Err(MarshalError::ConflictingParams),
            (params, None) => (params, self.alt_spec),
            (None, Some(kwparams)) => (Some(Params::Named(kwparams)), true),
        };

        if alt_spec && self.version != Version::V1_1 {
            return Err(MarshalError::malformed(
                "kwparams",
                format!("JSON-RPC {} has no alt-spec convention", self.version),
            ));
        }

        if self.version == Version::V1_0 && params.as_ref().is_some_and(Params::is_named) {
            return Err(MarshalError::malformed(
                "params",
                "JSON-RPC 1.0 only supports positional params",
            ));
        }

        // alt-spec only changes how named params are written
        let alt_spec = alt_spec && params.as_ref().is_some_and(Params::is_named);

        Ok(Call {
            version: self.version,
            method: self.method,
            params,
            id: self.id,
            alt_spec,
        })
    }
}
