//! # verdict-types — Leaf-Type Value Canonicalization
//!
//! Leaf types in the Verdict engine map heterogeneous external
//! representations onto internal canonical values: opaque identity
//! tokens. This crate provides the canonical value map a leaf type
//! accumulates at configuration time and the two-phase resolution it
//! applies at validation time.
//!
//! ## Immutability
//!
//! Every builder operation ([`ValueMap::extend`], [`TokenType::map`],
//! [`TokenType::valid`]) returns a new instance and leaves the published
//! one untouched. Construction failures are fatal and produce no partial
//! state; resolution failures are ordinary recoverable verdicts.

pub mod map;
pub mod token_type;

// Re-export primary types for ergonomic imports.
pub use map::{MapBuildError, MapKey, ValueMap};
pub use token_type::{ResolveError, TokenType};
