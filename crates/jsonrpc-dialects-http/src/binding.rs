//! The HTTP binding and per-request overrides.

use jsonrpc_dialects::Version;

use crate::config::{HttpBindingBuilder, HttpBindingConfig};

/// Marshals canonical calls and returns to and from HTTP messages.
///
/// Holds only immutable configuration, so one binding can be shared across
/// threads and reused for any number of messages.
#[derive(Debug, Clone, Default)]
pub struct HttpBinding {
    config: HttpBindingConfig,
}

impl HttpBinding {
    pub fn new(config: HttpBindingConfig) -> Self {
        Self { config }
    }

    pub fn builder() -> HttpBindingBuilder {
        HttpBindingBuilder::new()
    }

    pub fn config(&self) -> &HttpBindingConfig {
        &self.config
    }

    pub(crate) fn content_type(&self, version: Version) -> &str {
        self.config.content_types.for_version(version)
    }
}

/// Overrides for a single outbound request; unset fields fall back to the
/// binding configuration.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Target URI, defaults to the configured endpoint
    pub uri: Option<String>,
    pub prefer_get: Option<bool>,
    /// Encoded-style GET instead of query-style
    pub encoded: Option<bool>,
    pub content_type: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn get(mut self) -> Self {
        self.prefer_get = Some(true);
        self
    }

    pub fn post(mut self) -> Self {
        self.prefer_get = Some(false);
        self
    }

    pub fn encoded(mut self, encoded: bool) -> Self {
        self.encoded = Some(encoded);
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_binding_is_send_sync() {
        assert_send_sync::<HttpBinding>();
    }

    #[test]
    fn test_request_options() {
        let options = RequestOptions::new().uri("/rpc").get().encoded(false);
        assert_eq!(options.uri.as_deref(), Some("/rpc"));
        assert_eq!(options.prefer_get, Some(true));
        assert_eq!(options.encoded, Some(false));
        assert_eq!(options.content_type, None);
    }
}
