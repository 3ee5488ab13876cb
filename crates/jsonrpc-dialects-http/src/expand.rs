//! Conversion between flat query-parameter maps and nested params.

use std::fmt;

use serde_json::{Map, Value};

/// Expands flat `a.b` / `a[b]` style keys into nested values and back.
///
/// Only consulted when params expansion is enabled on the binding.
pub trait ParamExpander: Send + Sync + fmt::Debug {
    /// Flat map of query parameters to a nested value.
    fn expand(&self, flat: &Map<String, Value>) -> Value;

    /// Nested value to a flat map of query parameters.
    fn collapse(&self, nested: &Value) -> Map<String, Value>;
}

/// Default expander: `.` and `[...]` separate path segments, and objects
/// whose keys are exactly `0..n` become arrays.
#[derive(Debug, Clone, Copy, Default)]
pub struct DottedKeyExpander;

impl DottedKeyExpander {
    fn segments(key: &str) -> Vec<&str> {
        key.split(['.', '[', ']'])
            .filter(|segment| !segment.is_empty())
            .collect()
    }

    fn insert(root: &mut Map<String, Value>, path: &[&str], value: Value) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };
        let mut node = root;
        for segment in parents {
            let slot = node
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            node = match slot {
                Value::Object(map) => map,
                _ => return,
            };
        }
        node.insert(last.to_string(), value);
    }

    /// Objects keyed exactly `0..n` turn into arrays, recursively.
    fn arrayify(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let is_sequence = !map.is_empty()
                    && (0..map.len()).all(|i| map.contains_key(&i.to_string()));
                if is_sequence {
                    let mut map = map;
                    let items = (0..map.len())
                        .filter_map(|i| map.remove(&i.to_string()))
                        .map(Self::arrayify)
                        .collect();
                    Value::Array(items)
                } else {
                    Value::Object(
                        map.into_iter()
                            .map(|(k, v)| (k, Self::arrayify(v)))
                            .collect(),
                    )
                }
            }
            other => other,
        }
    }

    fn flatten(prefix: Option<&str>, value: &Value, out: &mut Map<String, Value>) {
        let join = |segment: &str| match prefix {
            Some(prefix) => format!("{}.{}", prefix, segment),
            None => segment.to_string(),
        };
        match value {
            Value::Object(map) if !map.is_empty() => {
                for (key, child) in map {
                    Self::flatten(Some(&join(key)), child, out);
                }
            }
            Value::Array(items) if !items.is_empty() => {
                for (index, child) in items.iter().enumerate() {
                    Self::flatten(Some(&join(&index.to_string())), child, out);
                }
            }
            leaf => {
                // empty containers stay as JSON leaves so they survive the trip
                if let Some(prefix) = prefix {
                    out.insert(prefix.to_string(), leaf.clone());
                }
            }
        }
    }
}

impl ParamExpander for DottedKeyExpander {
    fn expand(&self, flat: &Map<String, Value>) -> Value {
        let mut root = Map::new();
        for (key, value) in flat {
            let path = Self::segments(key);
            if path.is_empty() {
                continue;
            }
            Self::insert(&mut root, &path, value.clone());
        }
        Self::arrayify(Value::Object(root))
    }

    fn collapse(&self, nested: &Value) -> Map<String, Value> {
        let mut out = Map::new();
        Self::flatten(None, nested, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flat(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_expand_dotted_and_bracketed_keys() {
        let expanded = DottedKeyExpander.expand(&flat(json!({
            "user.name": "ada",
            "user[roles][0]": "admin",
            "user[roles][1]": "dev",
            "limit": 10
        })));
        assert_eq!(
            expanded,
            json!({
                "user": {"name": "ada", "roles": ["admin", "dev"]},
                "limit": 10
            })
        );
    }

    #[test]
    fn test_sparse_indices_stay_objects() {
        let expanded = DottedKeyExpander.expand(&flat(json!({"a.0": 1, "a.2": 3})));
        assert_eq!(expanded, json!({"a": {"0": 1, "2": 3}}));
    }

    #[test]
    fn test_top_level_indices_become_array() {
        let expanded = DottedKeyExpander.expand(&flat(json!({"0": "x", "1": "y"})));
        assert_eq!(expanded, json!(["x", "y"]));
    }

    #[test]
    fn test_collapse() {
        let collapsed = DottedKeyExpander.collapse(&json!({
            "user": {"name": "ada", "roles": ["admin", "dev"]},
            "empty": {},
            "limit": 10
        }));
        assert_eq!(
            Value::Object(collapsed),
            json!({
                "user.name": "ada",
                "user.roles.0": "admin",
                "user.roles.1": "dev",
                "empty": {},
                "limit": 10
            })
        );
    }

    #[test]
    fn test_collapse_then_expand() {
        let nested = json!({"a": {"b": [1, {"c": true}]}, "d": "e"});
        let expander = DottedKeyExpander;
        assert_eq!(expander.expand(&expander.collapse(&nested)), nested);
    }
}
