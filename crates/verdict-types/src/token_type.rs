//! # Token Leaf Type
//!
//! [`TokenType`] is the leaf type instance owning a canonical value map
//! and an allow-list. Builder calls return new instances — the published
//! instance is immutable, so concurrent validations against the same base
//! need no locking.
//!
//! ## Two-Phase Resolution
//!
//! With conversion enabled, a candidate is first looked up among the
//! map's keys by equality; on a miss it is checked by identity against
//! the allowed tokens (which include every token recorded in the map).
//! With conversion disabled, only the identity check runs — a recorded
//! key does not resolve.

use thiserror::Error;

use verdict_core::{ConfigValue, Token};

use crate::map::{MapBuildError, ValueMap};

/// Unresolved verdict from [`TokenType::resolve`].
///
/// Always-recoverable data-validation outcomes, one per call; the
/// surrounding engine aggregates them across larger structures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No canonical values are registered and the input is not a token.
    #[error("\"{label}\" must be a token")]
    TokenRequired {
        /// Position label supplied by the caller.
        label: String,
    },

    /// A map exists and conversion ran, but the input matched neither a
    /// recorded key nor an allowed token. `choices` enumerates every
    /// `key -> token` pair in insertion order, then any allowed tokens
    /// reachable only via the allow-list.
    #[error("\"{label}\" must be one of [{choices}]")]
    NoMatchWithMap {
        /// Position label supplied by the caller.
        label: String,
        /// Rendered `key -> token` enumeration.
        choices: String,
    },

    /// Conversion was disabled (or the input was already a token) and
    /// the identity check against the allowed tokens failed.
    #[error("\"{label}\" must be one of [{choices}]")]
    NoMatchDirect {
        /// Position label supplied by the caller.
        label: String,
        /// Rendered token enumeration.
        choices: String,
    },
}

/// An immutable token leaf type instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenType {
    map: ValueMap,
    allowed: Vec<Token>,
}

impl TokenType {
    /// A type with no map and no allowed tokens: accepts any token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a new instance whose map additionally holds the
    /// associations collected from `source`. Every newly recorded token
    /// joins the allowed set.
    ///
    /// # Errors
    ///
    /// Propagates [`MapBuildError`] from map construction; `self` is
    /// never altered.
    pub fn map(&self, source: &ConfigValue) -> Result<Self, MapBuildError> {
        let map = self.map.extend(source)?;
        let mut next = Self {
            map,
            allowed: self.allowed.clone(),
        };
        let recorded: Vec<Token> = next.map.tokens().cloned().collect();
        for token in recorded {
            next.allow(token);
        }
        Ok(next)
    }

    /// Return a new instance additionally permitting `tokens` directly.
    pub fn valid<I: IntoIterator<Item = Token>>(&self, tokens: I) -> Self {
        let mut next = self.clone();
        for token in tokens {
            next.allow(token);
        }
        next
    }

    fn allow(&mut self, token: Token) {
        if !self.allowed.iter().any(|t| t.same(&token)) {
            self.allowed.push(token);
        }
    }

    /// The canonical value map.
    pub fn value_map(&self) -> &ValueMap {
        &self.map
    }

    /// Allowed tokens in registration order.
    pub fn allowed(&self) -> &[Token] {
        &self.allowed
    }

    /// Resolve a candidate value to a canonical token.
    ///
    /// `convert` is sourced from the active preference set; `label`
    /// describes the candidate's position for error reporting.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] verdict when the candidate matches
    /// neither a recorded key (conversion only) nor an allowed token.
    pub fn resolve(
        &self,
        input: &ConfigValue,
        convert: bool,
        label: &str,
    ) -> Result<Token, ResolveError> {
        if convert {
            if let Some(token) = self.map.get(input) {
                return Ok(token.clone());
            }
        }

        if let Some(token) = input.as_token() {
            // With no registered canonical values the type accepts any
            // token unchanged.
            if self.allowed.is_empty() || self.allowed.iter().any(|t| t.same(token)) {
                return Ok(token.clone());
            }
            return Err(ResolveError::NoMatchDirect {
                label: label.to_string(),
                choices: self.direct_choices(),
            });
        }

        if self.allowed.is_empty() {
            return Err(ResolveError::TokenRequired {
                label: label.to_string(),
            });
        }

        if convert && !self.map.is_empty() {
            Err(ResolveError::NoMatchWithMap {
                label: label.to_string(),
                choices: self.map_choices(),
            })
        } else {
            Err(ResolveError::NoMatchDirect {
                label: label.to_string(),
                choices: self.direct_choices(),
            })
        }
    }

    /// Introspection export: the type name plus the map entries, in the
    /// engine's description format.
    pub fn describe(&self) -> ConfigValue {
        let mut fields = vec![("type".to_string(), ConfigValue::from("token"))];
        if !self.map.is_empty() {
            let entries = self.map.iter().map(|(key, token)| {
                ConfigValue::sequence([key_to_config(key), ConfigValue::from(token.clone())])
            });
            fields.push(("map".to_string(), ConfigValue::sequence(entries)));
        }
        ConfigValue::Record(fields)
    }

    fn map_choices(&self) -> String {
        let mut parts: Vec<String> = self
            .map
            .iter()
            .map(|(key, token)| format!("{key} -> {token}"))
            .collect();
        for token in &self.allowed {
            if !self.map.tokens().any(|recorded| recorded.same(token)) {
                parts.push(token.to_string());
            }
        }
        parts.join(", ")
    }

    fn direct_choices(&self) -> String {
        self.allowed
            .iter()
            .map(Token::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn key_to_config(key: &crate::map::MapKey) -> ConfigValue {
    use crate::map::MapKey;
    match key {
        MapKey::Null => ConfigValue::Null,
        MapKey::Bool(b) => ConfigValue::Bool(*b),
        MapKey::Number(n) => ConfigValue::Number(n.clone()),
        MapKey::Str(s) => ConfigValue::Str(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(key: ConfigValue, token: &Token) -> ConfigValue {
        ConfigValue::sequence([key, ConfigValue::from(token.clone())])
    }

    fn mapped() -> (TokenType, Token, Token) {
        let one = Token::labeled("1");
        let two = Token::labeled("2");
        let schema = TokenType::new()
            .map(&ConfigValue::sequence([
                pair(ConfigValue::from(1i64), &one),
                pair(ConfigValue::from("two"), &two),
            ]))
            .unwrap();
        (schema, one, two)
    }

    #[test]
    fn test_bare_type_accepts_any_token() {
        let schema = TokenType::new();
        let token = Token::new();
        assert_eq!(
            schema.resolve(&ConfigValue::from(token.clone()), true, "value"),
            Ok(token)
        );
    }

    #[test]
    fn test_bare_type_rejects_non_token() {
        let schema = TokenType::new();
        let err = schema
            .resolve(&ConfigValue::from(1i64), true, "value")
            .unwrap_err();
        assert_eq!(err.to_string(), "\"value\" must be a token");
    }

    #[test]
    fn test_map_converts_keys() {
        let (schema, one, two) = mapped();
        assert_eq!(schema.resolve(&ConfigValue::from(1i64), true, "value"), Ok(one));
        assert_eq!(
            schema.resolve(&ConfigValue::from("two"), true, "value"),
            Ok(two)
        );
    }

    #[test]
    fn test_string_key_does_not_match_number_key() {
        let (schema, ..) = mapped();
        let err = schema
            .resolve(&ConfigValue::from("1"), true, "value")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "\"value\" must be one of [1 -> Token(1), two -> Token(2)]"
        );
        assert!(matches!(err, ResolveError::NoMatchWithMap { .. }));
    }

    #[test]
    fn test_canonical_token_passes_through() {
        let (schema, one, _) = mapped();
        assert_eq!(
            schema.resolve(&ConfigValue::from(one.clone()), true, "value"),
            Ok(one.clone())
        );
        assert_eq!(
            schema.resolve(&ConfigValue::from(one.clone()), false, "value"),
            Ok(one)
        );
    }

    #[test]
    fn test_unrelated_token_gets_direct_message() {
        let (schema, ..) = mapped();
        let stranger = Token::labeled("1");
        let err = schema
            .resolve(&ConfigValue::from(stranger), true, "value")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "\"value\" must be one of [Token(1), Token(2)]"
        );
        assert!(matches!(err, ResolveError::NoMatchDirect { .. }));
    }

    #[test]
    fn test_convert_disabled_skips_map() {
        let (schema, _, two) = mapped();
        let err = schema
            .resolve(&ConfigValue::from(1i64), false, "value")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "\"value\" must be one of [Token(1), Token(2)]"
        );
        assert_eq!(
            schema.resolve(&ConfigValue::from(two.clone()), false, "value"),
            Ok(two)
        );
    }

    #[test]
    fn test_absent_key_unresolved_under_both_settings() {
        let (schema, ..) = mapped();
        for convert in [true, false] {
            assert!(schema
                .resolve(&ConfigValue::from("three"), convert, "value")
                .is_err());
        }
    }

    #[test]
    fn test_valid_extends_allow_list_only() {
        let extra = Token::labeled("extra");
        let (schema, ..) = mapped();
        let schema = schema.valid([extra.clone()]);

        assert_eq!(
            schema.resolve(&ConfigValue::from(extra.clone()), true, "value"),
            Ok(extra)
        );
        // Allow-list-only tokens appear after the arrowed map pairs.
        let err = schema
            .resolve(&ConfigValue::from("nope"), true, "value")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "\"value\" must be one of [1 -> Token(1), two -> Token(2), Token(extra)]"
        );
    }

    #[test]
    fn test_builders_leave_base_untouched() {
        let (base, ..) = mapped();
        let _bigger = base
            .map(&ConfigValue::sequence([pair(
                ConfigValue::from(3i64),
                &Token::labeled("3"),
            )]))
            .unwrap();
        let _wider = base.valid([Token::new()]);
        assert_eq!(base.value_map().len(), 2);
        assert_eq!(base.allowed().len(), 2);
    }

    #[test]
    fn test_describe_exports_map_entries() {
        let (schema, ..) = mapped();
        let description = schema.describe();
        assert_eq!(
            description.get("type").and_then(ConfigValue::as_str),
            Some("token")
        );
        let entries = description
            .get("map")
            .and_then(ConfigValue::as_sequence)
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].as_sequence().unwrap()[0], ConfigValue::from(1i64));
    }
}
