use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::{MarshalError, Result};

/// A correlation token for a JSON-RPC call.
/// Can be any JSON scalar except null; a null id on the wire means "no id".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    String(String),
    Number(Number),
    Bool(bool),
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::String(s) => write!(f, "{}", s),
            RequestId::Number(n) => write!(f, "{}", n),
            RequestId::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        RequestId::Number(n.into())
    }
}

impl From<u64> for RequestId {
    fn from(n: u64) -> Self {
        RequestId::Number(n.into())
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId::String(s.to_string())
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        RequestId::String(s)
    }
}

impl RequestId {
    /// Reads an id from a wire value. `None` for JSON null.
    pub fn from_value(value: &Value) -> Result<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(RequestId::String(s.clone()))),
            Value::Number(n) => Ok(Some(RequestId::Number(n.clone()))),
            Value::Bool(b) => Ok(Some(RequestId::Bool(*b))),
            Value::Array(_) | Value::Object(_) => Err(MarshalError::malformed(
                "id",
                "must be a string, number or boolean",
            )),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            RequestId::String(s) => Value::String(s.clone()),
            RequestId::Number(n) => Value::Number(n.clone()),
            RequestId::Bool(b) => Value::Bool(*b),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RequestId::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RequestId::Number(n) => n.as_i64(),
            _ => None,
        }
    }
}

/// JSON-RPC protocol revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Version {
    V1_0,
    V1_1,
    V2_0,
}

impl Version {
    /// All revisions, oldest first.
    pub const ALL: [Version; 3] = [Version::V1_0, Version::V1_1, Version::V2_0];

    /// Parses a wire tag like "1.0", "1.1" or "2.0".
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "1.0" => Some(Version::V1_0),
            "1.1" => Some(Version::V1_1),
            "2.0" => Some(Version::V2_0),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Version::V1_0 => "1.0",
            Version::V1_1 => "1.1",
            Version::V2_0 => "2.0",
        }
    }

    /// Whether a call without an id is a notification in this revision.
    pub fn supports_notifications(&self) -> bool {
        matches!(self, Version::V1_0 | Version::V2_0)
    }

    /// Whether calls of this revision may travel over HTTP GET.
    pub fn supports_get(&self) -> bool {
        !matches!(self, Version::V1_0)
    }
}

impl Default for Version {
    fn default() -> Self {
        Version::V2_0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Version::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid JSON-RPC version: {}", s)))
    }
}

/// An explicit dialect tag: a revision plus the 1.1 `kwparams` convention.
///
/// `"1.1-alt"` only exists as a caller-side tag; on the wire it is still
/// `version: "1.1"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dialect {
    pub version: Version,
    pub alt_spec: bool,
}

impl Dialect {
    pub const fn new(version: Version) -> Self {
        Self {
            version,
            alt_spec: false,
        }
    }

    pub const fn alt_spec() -> Self {
        Self {
            version: Version::V1_1,
            alt_spec: true,
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        if s == "1.1-alt" {
            return Ok(Self::alt_spec());
        }
        Version::parse(s)
            .map(Self::new)
            .ok_or_else(|| MarshalError::UnsupportedVersion(s.to_string()))
    }

    pub fn as_str(&self) -> &'static str {
        if self.alt_spec {
            "1.1-alt"
        } else {
            self.version.as_str()
        }
    }
}

impl From<Version> for Dialect {
    fn from(version: Version) -> Self {
        Self::new(version)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
