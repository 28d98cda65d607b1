//! Field access checks shared by the shape validators.
//!
//! Each helper either returns the typed payload or the first violation,
//! with the supplied path pointing at the field under inspection.

use verdict_core::{Callable, ConfigValue, FieldPath};

use crate::violation::{ShapeViolation, ViolationKind};

pub(crate) fn expect_record<'a>(
    value: &'a ConfigValue,
    path: &FieldPath,
) -> Result<&'a [(String, ConfigValue)], ShapeViolation> {
    value.as_record().ok_or_else(|| {
        ShapeViolation::new(
            path.clone(),
            ViolationKind::InvalidField,
            format!("must be a record, found {}", value.kind()),
        )
    })
}

pub(crate) fn expect_sequence<'a>(
    value: &'a ConfigValue,
    path: &FieldPath,
) -> Result<&'a [ConfigValue], ShapeViolation> {
    value.as_sequence().ok_or_else(|| {
        ShapeViolation::new(
            path.clone(),
            ViolationKind::InvalidField,
            format!("must be a sequence, found {}", value.kind()),
        )
    })
}

pub(crate) fn expect_str<'a>(
    value: &'a ConfigValue,
    path: &FieldPath,
) -> Result<&'a str, ShapeViolation> {
    value.as_str().ok_or_else(|| {
        ShapeViolation::new(
            path.clone(),
            ViolationKind::InvalidField,
            format!("must be a string, found {}", value.kind()),
        )
    })
}

pub(crate) fn expect_bool(value: &ConfigValue, path: &FieldPath) -> Result<bool, ShapeViolation> {
    value.as_bool().ok_or_else(|| {
        ShapeViolation::new(
            path.clone(),
            ViolationKind::InvalidField,
            format!("must be a boolean, found {}", value.kind()),
        )
    })
}

pub(crate) fn expect_callable<'a>(
    value: &'a ConfigValue,
    path: &FieldPath,
) -> Result<&'a Callable, ShapeViolation> {
    value.as_callable().ok_or_else(|| {
        ShapeViolation::new(
            path.clone(),
            ViolationKind::InvalidField,
            format!("must be a callable, found {}", value.kind()),
        )
    })
}

/// A string restricted to a fixed set of accepted values.
pub(crate) fn expect_one_of<'a>(
    value: &'a ConfigValue,
    path: &FieldPath,
    allowed: &[&str],
) -> Result<&'a str, ShapeViolation> {
    let text = expect_str(value, path)?;
    if allowed.contains(&text) {
        Ok(text)
    } else {
        Err(ShapeViolation::new(
            path.clone(),
            ViolationKind::InvalidField,
            format!("must be one of {}, found \"{text}\"", allowed.join(", ")),
        ))
    }
}

/// A flag that may only ever be the literal `true`.
pub(crate) fn expect_literal_true(
    value: &ConfigValue,
    path: &FieldPath,
) -> Result<(), ShapeViolation> {
    match value {
        ConfigValue::Bool(true) => Ok(()),
        other => Err(ShapeViolation::new(
            path.clone(),
            ViolationKind::InvalidField,
            format!("must be the literal true, found {}", other.kind()),
        )),
    }
}

/// A callable whose declared arity must fall within `min..=max`.
pub(crate) fn expect_arity<'a>(
    value: &'a ConfigValue,
    path: &FieldPath,
    min: usize,
    max: usize,
) -> Result<&'a Callable, ShapeViolation> {
    let callable = expect_callable(value, path)?;
    let arity = callable.arity();
    if arity < min || arity > max {
        let bounds = if min == max {
            format!("exactly {min}")
        } else {
            format!("between {min} and {max}")
        };
        return Err(ShapeViolation::new(
            path.clone(),
            ViolationKind::ArityMismatch,
            format!("must declare {bounds} parameters, found {arity}"),
        ));
    }
    Ok(callable)
}

/// Reject the first record key outside the closed `allowed` set.
pub(crate) fn ensure_known_keys(
    pairs: &[(String, ConfigValue)],
    allowed: &[&str],
    path: &FieldPath,
) -> Result<(), ShapeViolation> {
    for (key, _) in pairs {
        if !allowed.contains(&key.as_str()) {
            return Err(ShapeViolation::unknown_field(path, key));
        }
    }
    Ok(())
}
