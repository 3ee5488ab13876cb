//! Query-string parsing and building.
//!
//! Values are typed by trying to decode them as JSON: `x=1` is the number 1,
//! `x=abc` the string "abc". Strings that would read back as something else
//! (`"1"`, `"true"`) are written JSON-quoted.

use std::borrow::Cow;
use std::collections::HashSet;

use serde_json::{Map, Value};

/// Decoded query parameters in their original order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

pub(crate) fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

impl QueryParams {
    pub fn parse(query: Option<&str>) -> Self {
        let pairs = query
            .unwrap_or_default()
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key), decode_component(value))
            })
            .collect();
        Self { pairs }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Removes every occurrence of `key`, returning the last value.
    pub fn take(&mut self, key: &str) -> Option<String> {
        let mut taken = None;
        self.pairs.retain(|(k, v)| {
            if k == key {
                taken = Some(v.clone());
                false
            } else {
                true
            }
        });
        taken
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    /// Typed values; repeated keys collect into an array.
    pub fn into_map(self) -> Map<String, Value> {
        let mut map = Map::new();
        let mut repeated = HashSet::new();
        for (key, raw) in self.pairs {
            let value = decode_value(&raw);
            match map.get_mut(&key) {
                Some(Value::Array(items)) if repeated.contains(&key) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                    repeated.insert(key);
                }
                None => {
                    map.insert(key, value);
                }
            }
        }
        map
    }
}

/// Types a raw query value by decoding it as JSON, falling back to a string.
pub fn decode_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Renders a value so that [`decode_value`] reads back the same value.
pub fn encode_value(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) if decode_value(s) == *value => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}

/// Builds `k=v&k=v` with both sides percent-encoded.
pub fn build<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, Cow<'a, str>)>,
{
    pairs
        .into_iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(&value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}
