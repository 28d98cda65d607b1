//! # Shape Violations
//!
//! Every validator in this crate reports rejection through
//! [`ShapeViolation`]: the structural path to the offending field, a
//! machine-readable [`ViolationKind`], and a human-readable message.
//! Validation stops at the first violated constraint — callers get
//! exactly one verdict per call.

use serde::Serialize;
use thiserror::Error;

use verdict_core::FieldPath;

/// Machine-readable classification of a shape violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// The value matches none of the known configuration shapes.
    UnknownShape,
    /// A required field is absent.
    MissingField,
    /// A field outside the closed key set is present.
    UnknownField,
    /// A field is present but carries the wrong type or value.
    InvalidField,
    /// A callable's declared parameter count is outside its bounds.
    ArityMismatch,
    /// None of a set of mutually-supporting fields is present.
    MissingAlternative,
}

/// Structured rejection verdict from a shape validator.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("invalid configuration at {path}: {message}")]
pub struct ShapeViolation {
    /// Structural path to the offending field.
    pub path: FieldPath,
    /// Machine-readable violation classification.
    pub kind: ViolationKind,
    /// Human-readable description of the violated constraint.
    pub message: String,
}

impl ShapeViolation {
    /// Construct a violation at `path`.
    pub fn new(path: FieldPath, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
        }
    }

    /// A required field under `path` is missing.
    pub fn missing(path: &FieldPath, field: &str) -> Self {
        Self::new(
            path.key(field),
            ViolationKind::MissingField,
            format!("required field \"{field}\" is missing"),
        )
    }

    /// A field outside the closed key set is present under `path`.
    pub fn unknown_field(path: &FieldPath, field: &str) -> Self {
        Self::new(
            path.key(field),
            ViolationKind::UnknownField,
            format!("field \"{field}\" is not recognized"),
        )
    }
}
