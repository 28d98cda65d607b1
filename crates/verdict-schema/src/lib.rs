//! # verdict-schema — Self-Validating Configuration Layer
//!
//! Before the Verdict engine accepts any configuration object — engine-wide
//! preferences, an extension declaration, a value descriptor for a
//! default/fail-over slot, or an exported type description — the object
//! passes through the validators in this crate.
//!
//! ## Shape Catalog
//!
//! Descriptors form a closed family: four scalar leaves, five
//! discriminator-keyed record shapes, and self-reference (nested slots
//! re-enter the validator). Wrapper records (preferences, extensions,
//! descriptions) are validated against fixed key sets with required-field,
//! arity, and compound constraints.
//!
//! ## Verdicts
//!
//! Every validator is a pure function returning exactly one structured
//! verdict: the typed result on acceptance, or a [`ShapeViolation`]
//! carrying the structural path, a machine-readable kind, and a message
//! for the first violated constraint.

mod fields;

pub mod description;
pub mod descriptor;
pub mod extension;
pub mod preferences;
pub mod violation;

// Re-export primary types for ergonomic imports.
pub use description::validate_description;
pub use descriptor::{validate_descriptor, validate_descriptor_at, Descriptor, RefDescriptor, RefSource};
pub use extension::{validate_extension, validate_extension_list};
pub use preferences::{DateFormat, ErrorPrefs, Preferences, Presence, StripUnknown};
pub use violation::{ShapeViolation, ViolationKind};
