//! # Canonical Value Map
//!
//! A [`ValueMap`] records which raw inputs a leaf type canonicalizes,
//! pairing each primitive key with the identity [`Token`] it resolves to.
//! Maps grow by [`ValueMap::extend`] from validated association sources
//! and are never mutated in place: every extension produces a new map and
//! leaves the published one untouched.
//!
//! ## Key Discipline
//!
//! Keys must be directly comparable primitives — never records,
//! sequences, callables, or tokens. Values must be tokens. Both rules are
//! enforced at construction; violations are fatal [`MapBuildError`]s and
//! no partial map is ever produced.

use std::fmt;

use serde_json::Number;
use thiserror::Error;

use verdict_core::{ConfigValue, Token};

/// A directly comparable primitive map key.
///
/// Number keys keep `serde_json::Number` equality: the integer `1`, the
/// float `1.5`, and the string `"1"` are three distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MapKey {
    /// The null key.
    Null,
    /// A boolean key.
    Bool(bool),
    /// A numeric key.
    Number(Number),
    /// A string key.
    Str(String),
}

impl MapKey {
    /// Classify a raw value as a map key, rejecting non-primitives.
    pub fn from_config(value: &ConfigValue) -> Option<MapKey> {
        match value {
            ConfigValue::Null => Some(MapKey::Null),
            ConfigValue::Bool(b) => Some(MapKey::Bool(*b)),
            ConfigValue::Number(n) => Some(MapKey::Number(n.clone())),
            ConfigValue::Str(s) => Some(MapKey::Str(s.clone())),
            ConfigValue::Sequence(_)
            | ConfigValue::Record(_)
            | ConfigValue::Callable(_)
            | ConfigValue::Token(_) => None,
        }
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKey::Null => write!(f, "null"),
            MapKey::Bool(b) => write!(f, "{b}"),
            MapKey::Number(n) => write!(f, "{n}"),
            MapKey::Str(s) => write!(f, "{s}"),
        }
    }
}

/// Fatal error while building a map from an association source.
///
/// These are configuration/programmer errors: the builder call aborts,
/// no partial map is produced, and nothing is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapBuildError {
    /// The source is neither a sequence of pairs nor a record.
    #[error("association source must be a sequence of pairs or a record, found {kind}")]
    InvalidSource {
        /// Kind noun of the rejected source.
        kind: &'static str,
    },

    /// A source element is not a 2-element sequence.
    #[error("association entry at index {index} must be a 2-element sequence")]
    InvalidEntry {
        /// Position of the rejected element.
        index: usize,
    },

    /// A key is a record, sequence, callable, or token.
    #[error("association key at index {index} must not be a record, sequence, callable, or token")]
    InvalidKey {
        /// Position of the rejected element.
        index: usize,
    },

    /// A paired value is not an identity token.
    #[error("association value at index {index} must be a token")]
    InvalidValue {
        /// Position of the rejected element.
        index: usize,
    },
}

/// Ordered, append-grown map from primitive keys to canonical tokens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap {
    entries: Vec<(MapKey, Token)>,
}

impl ValueMap {
    /// The empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a new map holding this map's entries plus those collected
    /// from `source`: a sequence of 2-element pairs, or a record whose
    /// string keys become string map keys.
    ///
    /// A later entry whose key collides with an earlier one overrides
    /// it; the overridden entry keeps its original position.
    ///
    /// # Errors
    ///
    /// Any invalid source, entry, key, or value aborts the call with a
    /// [`MapBuildError`]; `self` is never altered.
    pub fn extend(&self, source: &ConfigValue) -> Result<ValueMap, MapBuildError> {
        let additions = collect_entries(source)?;
        let mut next = self.clone();
        for (key, token) in additions {
            next.insert(key, token);
        }
        Ok(next)
    }

    fn insert(&mut self, key: MapKey, token: Token) {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = token;
        } else {
            self.entries.push((key, token));
        }
    }

    /// Look up the token recorded for a raw value by key equality.
    /// Non-primitive inputs match nothing.
    pub fn get(&self, input: &ConfigValue) -> Option<&Token> {
        let key = MapKey::from_config(input)?;
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, token)| token)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &(MapKey, Token)> {
        self.entries.iter()
    }

    /// Recorded tokens in insertion order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.entries.iter().map(|(_, token)| token)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn collect_entries(source: &ConfigValue) -> Result<Vec<(MapKey, Token)>, MapBuildError> {
    match source {
        ConfigValue::Sequence(items) => {
            let mut entries = Vec::with_capacity(items.len());
            for (index, entry) in items.iter().enumerate() {
                let pair = entry
                    .as_sequence()
                    .filter(|elements| elements.len() == 2)
                    .ok_or(MapBuildError::InvalidEntry { index })?;
                let key = MapKey::from_config(&pair[0])
                    .ok_or(MapBuildError::InvalidKey { index })?;
                let token = pair[1]
                    .as_token()
                    .ok_or(MapBuildError::InvalidValue { index })?
                    .clone();
                entries.push((key, token));
            }
            Ok(entries)
        }
        ConfigValue::Record(pairs) => {
            let mut entries = Vec::with_capacity(pairs.len());
            for (index, (key, value)) in pairs.iter().enumerate() {
                let token = value
                    .as_token()
                    .ok_or(MapBuildError::InvalidValue { index })?
                    .clone();
                entries.push((MapKey::Str(key.clone()), token));
            }
            Ok(entries)
        }
        other => Err(MapBuildError::InvalidSource { kind: other.kind() }),
    }
}
