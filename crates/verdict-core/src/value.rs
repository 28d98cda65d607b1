//! # Configuration Value Model
//!
//! [`ConfigValue`] is the single dynamic representation for raw
//! configuration handed to the engine: engine-wide preferences, extension
//! declarations, descriptors, and the association sources a leaf type's
//! map is built from. It covers the JSON data model plus the two leaves
//! JSON cannot express — [`Callable`] references and identity [`Token`]s.
//!
//! ## Records Preserve Order
//!
//! Records are ordered pair lists, not hash maps. Validation error
//! enumeration and map construction both depend on insertion order, and
//! the key counts involved are small; lookup scans for the first match.
//!
//! ## JSON Bridge
//!
//! JSON-sourced configuration converts losslessly via
//! `From<serde_json::Value>`. The reverse direction, [`ConfigValue::to_json`],
//! is fallible: callables and tokens have no JSON form and are reported
//! with [`ToJsonError`] rather than silently substituted.

use serde_json::{Map as JsonMap, Number, Value as JsonValue};
use thiserror::Error;

use crate::callable::Callable;
use crate::token::Token;

/// A dynamically-shaped configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    /// Absent/empty leaf.
    Null,
    /// Boolean leaf.
    Bool(bool),
    /// Numeric leaf. `serde_json::Number` keeps integer and float
    /// representations distinct, which key comparison relies on.
    Number(Number),
    /// String leaf.
    Str(String),
    /// Ordered sequence of values.
    Sequence(Vec<ConfigValue>),
    /// Ordered record of key/value pairs.
    Record(Vec<(String, ConfigValue)>),
    /// Host-supplied function reference.
    Callable(Callable),
    /// Opaque identity token.
    Token(Token),
}

/// A value that cannot be represented as JSON.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot represent {kind} value as JSON")]
pub struct ToJsonError {
    /// Kind noun of the offending value.
    pub kind: &'static str,
}

impl ConfigValue {
    /// Build a record from key/value pairs, preserving their order.
    pub fn record<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ConfigValue)>,
    {
        Self::Record(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a sequence from values.
    pub fn sequence<I: IntoIterator<Item = ConfigValue>>(items: I) -> Self {
        Self::Sequence(items.into_iter().collect())
    }

    /// Stable lowercase noun for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Str(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Record(_) => "record",
            Self::Callable(_) => "callable",
            Self::Token(_) => "token",
        }
    }

    /// The boolean payload, if this is a boolean leaf.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The numeric payload, if this is a number leaf.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }

    /// The string payload, if this is a string leaf.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The element list, if this is a sequence.
    pub fn as_sequence(&self) -> Option<&[ConfigValue]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// The pair list, if this is a record.
    pub fn as_record(&self) -> Option<&[(String, ConfigValue)]> {
        match self {
            Self::Record(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// The callable payload, if this is a callable leaf.
    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Self::Callable(c) => Some(c),
            _ => None,
        }
    }

    /// The token payload, if this is a token leaf.
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Self::Token(t) => Some(t),
            _ => None,
        }
    }

    /// First value recorded under `key`, if this is a record.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.as_record()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Convert to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ToJsonError`] if the tree contains a callable or token
    /// leaf anywhere.
    pub fn to_json(&self) -> Result<JsonValue, ToJsonError> {
        match self {
            Self::Null => Ok(JsonValue::Null),
            Self::Bool(b) => Ok(JsonValue::Bool(*b)),
            Self::Number(n) => Ok(JsonValue::Number(n.clone())),
            Self::Str(s) => Ok(JsonValue::String(s.clone())),
            Self::Sequence(items) => {
                let converted: Result<Vec<_>, _> =
                    items.iter().map(ConfigValue::to_json).collect();
                Ok(JsonValue::Array(converted?))
            }
            Self::Record(pairs) => {
                let mut map = JsonMap::new();
                for (key, value) in pairs {
                    map.insert(key.clone(), value.to_json()?);
                }
                Ok(JsonValue::Object(map))
            }
            Self::Callable(_) | Self::Token(_) => Err(ToJsonError { kind: self.kind() }),
        }
    }
}

impl From<JsonValue> for ConfigValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => Self::Number(n),
            JsonValue::String(s) => Self::Str(s),
            JsonValue::Array(items) => {
                Self::Sequence(items.into_iter().map(ConfigValue::from).collect())
            }
            JsonValue::Object(map) => Self::Record(
                map.into_iter()
                    .map(|(k, v)| (k, ConfigValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        Self::Number(Number::from(n))
    }
}

impl From<u64> for ConfigValue {
    fn from(n: u64) -> Self {
        Self::Number(Number::from(n))
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Token> for ConfigValue {
    fn from(token: Token) -> Self {
        Self::Token(token)
    }
}

impl From<Callable> for ConfigValue {
    fn from(callable: Callable) -> Self {
        Self::Callable(callable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_nouns() {
        assert_eq!(ConfigValue::Null.kind(), "null");
        assert_eq!(ConfigValue::from(true).kind(), "boolean");
        assert_eq!(ConfigValue::from(1i64).kind(), "number");
        assert_eq!(ConfigValue::from("x").kind(), "string");
        assert_eq!(ConfigValue::sequence([]).kind(), "sequence");
        assert_eq!(ConfigValue::record::<String, _>([]).kind(), "record");
        assert_eq!(ConfigValue::from(Callable::new(1)).kind(), "callable");
        assert_eq!(ConfigValue::from(Token::new()).kind(), "token");
    }

    #[test]
    fn test_record_get_first_match() {
        let record = ConfigValue::record([
            ("a", ConfigValue::from(1i64)),
            ("b", ConfigValue::from(2i64)),
            ("a", ConfigValue::from(3i64)),
        ]);
        assert_eq!(record.get("a"), Some(&ConfigValue::from(1i64)));
        assert_eq!(record.get("b"), Some(&ConfigValue::from(2i64)));
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn test_from_json_preserves_shape() {
        let value = ConfigValue::from(json!({
            "template": "hello {name}",
            "options": {"count": 3, "strict": true},
            "items": [1, "two", null]
        }));
        assert_eq!(
            value.get("template").and_then(ConfigValue::as_str),
            Some("hello {name}")
        );
        let items = value.get("items").and_then(ConfigValue::as_sequence).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[2], ConfigValue::Null);
    }

    #[test]
    fn test_json_round_trip() {
        let original = json!({"a": [1, 2.5, "x"], "b": {"nested": false}});
        let config = ConfigValue::from(original.clone());
        assert_eq!(config.to_json().unwrap(), original);
    }

    #[test]
    fn test_to_json_rejects_token_leaf() {
        let value = ConfigValue::record([("default", ConfigValue::from(Token::new()))]);
        let err = value.to_json().unwrap_err();
        assert_eq!(err.kind, "token");
        assert_eq!(err.to_string(), "cannot represent token value as JSON");
    }

    #[test]
    fn test_to_json_rejects_callable_leaf() {
        let value = ConfigValue::sequence([ConfigValue::from(Callable::new(2))]);
        assert_eq!(value.to_json().unwrap_err().kind, "callable");
    }

    #[test]
    fn test_number_integer_and_float_distinct() {
        let int = ConfigValue::from(1i64);
        let float = ConfigValue::Number(Number::from_f64(1.5).unwrap());
        assert_ne!(int, float);
        assert_ne!(int, ConfigValue::from("1"));
    }
}
