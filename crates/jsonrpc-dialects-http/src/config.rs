//! Binding configuration and its builder.

use std::sync::Arc;

use jsonrpc_dialects::Version;

use crate::HttpBinding;
use crate::expand::{DottedKeyExpander, ParamExpander};

/// Content type written for each revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTypes {
    v1_0: String,
    v1_1: String,
    v2_0: String,
}

impl Default for ContentTypes {
    fn default() -> Self {
        Self {
            v1_0: "application/json".to_string(),
            v1_1: "application/json".to_string(),
            v2_0: "application/json-rpc".to_string(),
        }
    }
}

impl ContentTypes {
    pub fn for_version(&self, version: Version) -> &str {
        match version {
            Version::V1_0 => &self.v1_0,
            Version::V1_1 => &self.v1_1,
            Version::V2_0 => &self.v2_0,
        }
    }

    pub fn set(&mut self, version: Version, content_type: impl Into<String>) {
        let slot = match version {
            Version::V1_0 => &mut self.v1_0,
            Version::V1_1 => &mut self.v1_1,
            Version::V2_0 => &mut self.v2_0,
        };
        *slot = content_type.into();
    }
}

/// Configuration for an [`HttpBinding`]
#[derive(Debug, Clone)]
pub struct HttpBindingConfig {
    /// Path the binding is mounted on; REST-style method segments follow it
    pub endpoint: String,
    /// Send calls as GET when the revision allows it
    pub prefer_get: bool,
    /// Inbound GET: treat a `params` query value as an encoded blob
    pub prefer_encoded_get: bool,
    /// Outbound GET: encoded style, or `None` for "only for 2.0"
    pub encoded_get: Option<bool>,
    /// Method as the last path segment instead of a `method` parameter
    pub rest_style_methods: bool,
    /// Run query parameters through the expander
    pub expand_params: bool,
    pub expander: Arc<dyn ParamExpander>,
    pub content_types: ContentTypes,
    /// Revision used when a failed response body cannot be decoded
    pub default_version: Version,
}

impl Default for HttpBindingConfig {
    fn default() -> Self {
        Self {
            endpoint: "/".to_string(),
            prefer_get: false,
            prefer_encoded_get: true,
            encoded_get: None,
            rest_style_methods: false,
            expand_params: false,
            expander: Arc::new(DottedKeyExpander),
            content_types: ContentTypes::default(),
            default_version: Version::V2_0,
        }
    }
}

impl HttpBindingConfig {
    /// Whether an outbound GET for `version` uses the encoded style.
    pub fn encoded_get_for(&self, version: Version) -> bool {
        self.encoded_get.unwrap_or(version == Version::V2_0)
    }
}

/// Builder for [`HttpBinding`]
#[derive(Debug, Default)]
pub struct HttpBindingBuilder {
    config: HttpBindingConfig,
}

impl HttpBindingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    pub fn prefer_get(mut self, enable: bool) -> Self {
        self.config.prefer_get = enable;
        self
    }

    pub fn prefer_encoded_get(mut self, enable: bool) -> Self {
        self.config.prefer_encoded_get = enable;
        self
    }

    pub fn encoded_get(mut self, enable: bool) -> Self {
        self.config.encoded_get = Some(enable);
        self
    }

    pub fn rest_style_methods(mut self, enable: bool) -> Self {
        self.config.rest_style_methods = enable;
        self
    }

    pub fn expand_params(mut self, enable: bool) -> Self {
        self.config.expand_params = enable;
        self
    }

    /// Replaces the expander and turns expansion on.
    pub fn expander<E>(mut self, expander: E) -> Self
    where
        E: ParamExpander + 'static,
    {
        self.config.expander = Arc::new(expander);
        self.config.expand_params = true;
        self
    }

    pub fn content_type(mut self, version: Version, content_type: impl Into<String>) -> Self {
        self.config.content_types.set(version, content_type);
        self
    }

    pub fn default_version(mut self, version: Version) -> Self {
        self.config.default_version = version;
        self
    }

    pub fn build(self) -> HttpBinding {
        HttpBinding::new(self.config)
    }
}
