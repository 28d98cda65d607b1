//! # Description Shape Validation
//!
//! A description is the engine's introspection/export format for a
//! configured type: its type name plus a closed catalog of flags. The
//! default and fail-over flag slots hold descriptors and re-enter the
//! descriptor validator; the `empty` flag holds a nested description and
//! re-enters this validator. Unknown keys are tolerated at the top level
//! only — types append their own rule output there — while the flag
//! catalog itself is closed.

use verdict_core::{ConfigValue, FieldPath};

use crate::descriptor::validate_descriptor_at;
use crate::fields::{
    ensure_known_keys, expect_bool, expect_literal_true, expect_one_of, expect_record, expect_str,
};
use crate::violation::ShapeViolation;

/// Validate a type description.
///
/// # Errors
///
/// Returns the first violated constraint with its structural path.
pub fn validate_description(raw: &ConfigValue) -> Result<(), ShapeViolation> {
    validate_description_at(raw, &FieldPath::root())
}

fn validate_description_at(raw: &ConfigValue, path: &FieldPath) -> Result<(), ShapeViolation> {
    expect_record(raw, path)?;

    raw.get("type")
        .ok_or_else(|| ShapeViolation::missing(path, "type"))
        .and_then(|name| expect_str(name, &path.key("type")))?;

    if let Some(flags) = raw.get("flags") {
        validate_flags(flags, &path.key("flags"))?;
    }

    Ok(())
}

fn validate_flags(flags: &ConfigValue, path: &FieldPath) -> Result<(), ShapeViolation> {
    let pairs = expect_record(flags, path)?;
    ensure_known_keys(
        pairs,
        &[
            "cast",
            "default",
            "description",
            "empty",
            "encoding",
            "failover",
            "format",
            "id",
            "insensitive",
            "label",
            "only",
            "presence",
            "result",
            "single",
            "sparse",
            "strip",
            "truncate",
            "unit",
            "unknown",
            "unsafe",
        ],
        path,
    )?;

    for (key, value) in pairs {
        let field = path.key(key);
        match key.as_str() {
            "cast" | "description" | "encoding" | "id" | "label" | "unit" => {
                expect_str(value, &field)?;
            }
            // Descriptor-bearing slots re-enter the descriptor validator.
            "default" | "failover" => {
                validate_descriptor_at(value, &field)?;
            }
            // A nested description: self-reference.
            "empty" => validate_description_at(value, &field)?,
            "format" => {
                expect_one_of(value, &field, &["iso", "javascript", "unix"])?;
            }
            "presence" => {
                expect_one_of(value, &field, &["optional", "required", "forbidden"])?;
            }
            "result" => {
                expect_one_of(value, &field, &["raw", "strip"])?;
            }
            "insensitive" | "single" | "sparse" | "strip" | "truncate" | "unsafe" => {
                expect_bool(value, &field)?;
            }
            "only" | "unknown" => expect_literal_true(value, &field)?,
            // ensure_known_keys has already rejected anything else.
            _ => {}
        }
    }

    Ok(())
}
