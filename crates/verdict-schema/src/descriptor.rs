//! # Descriptor Shape Validation
//!
//! A descriptor specifies how a configurable value slot (a default, a
//! fail-over, a dynamic reference) is produced. Descriptors form a small
//! closed family of shapes: four scalar leaves, five discriminator-keyed
//! record shapes, and self-reference — designated nested slots re-enter
//! the validator, so a reference's remapping table may itself contain
//! descriptors to unbounded depth.
//!
//! ## Disambiguation
//!
//! Scalar leaves are matched first. Each record shape requires a distinct
//! discriminator key (`function`, `ref`, `special`, `template`, `value`),
//! so match order among them is irrelevant: a record is routed by the
//! discriminator it carries and then held to that shape's closed key set.
//! A record carrying none of the discriminators, and any other input, is
//! rejected with [`ViolationKind::UnknownShape`].
//!
//! Validation is pure: the input is never mutated, and the first violated
//! constraint is reported with its structural path.

use serde_json::Number;
use tracing::{debug, trace};

use verdict_core::{Callable, ConfigValue, FieldPath};

use crate::fields::{
    ensure_known_keys, expect_bool, expect_callable, expect_literal_true, expect_one_of,
    expect_record, expect_sequence, expect_str,
};
use crate::violation::{ShapeViolation, ViolationKind};

/// A validated configuration descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    /// Boolean literal.
    Bool(bool),
    /// Bare callable reference, invoked to compute the value.
    Callable(Callable),
    /// Number literal.
    Number(Number),
    /// String literal.
    Str(String),
    /// Wrapped callable: `{function: <callable>, options: {literal: true}}`.
    Function {
        /// The wrapped callable.
        function: Callable,
        /// Whether the callable is the value itself rather than a factory.
        literal: bool,
    },
    /// Dynamic reference into the value under validation or its context.
    Ref(RefDescriptor),
    /// The deep-default marker: `{special: "deep"}`.
    Special,
    /// String template: `{template: <string>, options: <record>}`.
    Template {
        /// Template source text.
        template: String,
        /// Rendering options, passed through unvalidated.
        options: Option<Vec<(String, ConfigValue)>>,
    },
    /// Literal structured value: `{value: <record-or-sequence>}`.
    Value(ConfigValue),
}

/// Where a reference resolves from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefSource {
    /// The value under validation (the default).
    Value,
    /// The external validation context.
    Context,
    /// Rule-local bindings.
    Local,
}

/// A validated `{ref: {...}}` descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct RefDescriptor {
    /// Ordered lookup path. Required; elements are passed through raw.
    pub path: Vec<ConfigValue>,
    /// Resolution root. Absent means the default (`value`).
    pub source: Option<RefSource>,
    /// Path separator override.
    pub separator: Option<String>,
    /// How many ancestors to climb before applying `path`.
    pub ancestor: Option<u64>,
    /// Remapping table: raw key paired with a nested descriptor.
    pub map: Option<Vec<(ConfigValue, Descriptor)>>,
    /// Post-resolution adjustment hook.
    pub adjust: Option<Callable>,
    /// Whether resolution descends into iterable values.
    pub iterables: Option<bool>,
}

impl Descriptor {
    /// Stable shape noun, matching the discriminator keys.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Callable(_) => "callable",
            Self::Number(_) => "number",
            Self::Str(_) => "string",
            Self::Function { .. } => "function",
            Self::Ref(_) => "ref",
            Self::Special => "special",
            Self::Template { .. } => "template",
            Self::Value(_) => "value",
        }
    }
}

/// Decide whether `raw` has one of the legal descriptor shapes.
///
/// # Errors
///
/// Returns the first violated constraint with the structural path to the
/// offending field.
pub fn validate_descriptor(raw: &ConfigValue) -> Result<Descriptor, ShapeViolation> {
    let result = validate_descriptor_at(raw, &FieldPath::root());
    match &result {
        Ok(descriptor) => trace!(shape = descriptor.shape(), "descriptor accepted"),
        Err(violation) => {
            debug!(path = %violation.path, kind = ?violation.kind, "descriptor rejected");
        }
    }
    result
}

/// [`validate_descriptor`] with an explicit starting path, for callers
/// validating a descriptor embedded in a larger configuration object.
pub fn validate_descriptor_at(
    raw: &ConfigValue,
    path: &FieldPath,
) -> Result<Descriptor, ShapeViolation> {
    match raw {
        // Scalar leaves.
        ConfigValue::Bool(b) => Ok(Descriptor::Bool(*b)),
        ConfigValue::Callable(c) => Ok(Descriptor::Callable(c.clone())),
        ConfigValue::Number(n) => Ok(Descriptor::Number(n.clone())),
        ConfigValue::Str(s) => Ok(Descriptor::Str(s.clone())),

        // Discriminator-keyed record shapes.
        ConfigValue::Record(_) => validate_record_shape(raw, path),

        other => Err(ShapeViolation::new(
            path.clone(),
            ViolationKind::UnknownShape,
            format!("{} is not a recognized descriptor shape", other.kind()),
        )),
    }
}

fn validate_record_shape(
    record: &ConfigValue,
    path: &FieldPath,
) -> Result<Descriptor, ShapeViolation> {
    if record.get("function").is_some() {
        validate_function(record, path)
    } else if record.get("ref").is_some() {
        validate_ref(record, path)
    } else if record.get("special").is_some() {
        validate_special(record, path)
    } else if record.get("template").is_some() {
        validate_template(record, path)
    } else if record.get("value").is_some() {
        validate_value(record, path)
    } else {
        Err(ShapeViolation::new(
            path.clone(),
            ViolationKind::UnknownShape,
            "record carries none of the descriptor discriminators \
             (function, ref, special, template, value)",
        ))
    }
}

fn validate_function(
    record: &ConfigValue,
    path: &FieldPath,
) -> Result<Descriptor, ShapeViolation> {
    let pairs = expect_record(record, path)?;
    ensure_known_keys(pairs, &["function", "options"], path)?;

    let function = expect_callable(
        record.get("function").unwrap_or(&ConfigValue::Null),
        &path.key("function"),
    )?
    .clone();

    let mut literal = false;
    if let Some(options) = record.get("options") {
        let options_path = path.key("options");
        let option_pairs = expect_record(options, &options_path)?;
        ensure_known_keys(option_pairs, &["literal"], &options_path)?;
        if let Some(flag) = options.get("literal") {
            expect_literal_true(flag, &options_path.key("literal"))?;
            literal = true;
        }
    }

    Ok(Descriptor::Function { function, literal })
}

fn validate_ref(record: &ConfigValue, path: &FieldPath) -> Result<Descriptor, ShapeViolation> {
    let pairs = expect_record(record, path)?;
    ensure_known_keys(pairs, &["ref"], path)?;

    let ref_path = path.key("ref");
    let inner = record.get("ref").unwrap_or(&ConfigValue::Null);
    let inner_pairs = expect_record(inner, &ref_path)?;
    ensure_known_keys(
        inner_pairs,
        &[
            "path",
            "value",
            "separator",
            "ancestor",
            "map",
            "adjust",
            "iterables",
        ],
        &ref_path,
    )?;

    let lookup = inner
        .get("path")
        .ok_or_else(|| ShapeViolation::missing(&ref_path, "path"))?;
    let lookup = expect_sequence(lookup, &ref_path.key("path"))?.to_vec();

    let source = match inner.get("value") {
        None => None,
        Some(value) => Some(
            match expect_one_of(value, &ref_path.key("value"), &["value", "context", "local"])? {
                "value" => RefSource::Value,
                "context" => RefSource::Context,
                _ => RefSource::Local,
            },
        ),
    };

    let separator = match inner.get("separator") {
        None => None,
        Some(value) => Some(expect_str(value, &ref_path.key("separator"))?.to_string()),
    };

    let ancestor = match inner.get("ancestor") {
        None => None,
        Some(value) => {
            let field_path = ref_path.key("ancestor");
            let number = value.as_number().ok_or_else(|| {
                ShapeViolation::new(
                    field_path.clone(),
                    ViolationKind::InvalidField,
                    format!("must be a number, found {}", value.kind()),
                )
            })?;
            Some(number.as_u64().ok_or_else(|| {
                ShapeViolation::new(
                    field_path,
                    ViolationKind::InvalidField,
                    format!("must be a non-negative integer, found {number}"),
                )
            })?)
        }
    };

    let map = match inner.get("map") {
        None => None,
        Some(value) => Some(validate_ref_map(value, &ref_path.key("map"))?),
    };

    let adjust = match inner.get("adjust") {
        None => None,
        Some(value) => Some(expect_callable(value, &ref_path.key("adjust"))?.clone()),
    };

    let iterables = match inner.get("iterables") {
        None => None,
        Some(value) => Some(expect_bool(value, &ref_path.key("iterables"))?),
    };

    Ok(Descriptor::Ref(RefDescriptor {
        path: lookup,
        source,
        separator,
        ancestor,
        map,
        adjust,
        iterables,
    }))
}

/// Validate a reference remapping table: a non-empty sequence of
/// 2-element pairs whose second element is itself a descriptor
/// (self-reference — the validator re-enters here).
fn validate_ref_map(
    value: &ConfigValue,
    path: &FieldPath,
) -> Result<Vec<(ConfigValue, Descriptor)>, ShapeViolation> {
    let entries = expect_sequence(value, path)?;
    if entries.is_empty() {
        return Err(ShapeViolation::new(
            path.clone(),
            ViolationKind::InvalidField,
            "must contain at least one pair",
        ));
    }

    let mut pairs = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let entry_path = path.index(index);
        let elements = expect_sequence(entry, &entry_path)?;
        if elements.len() != 2 {
            return Err(ShapeViolation::new(
                entry_path,
                ViolationKind::InvalidField,
                format!("must be a 2-element pair, found length {}", elements.len()),
            ));
        }
        let nested = validate_descriptor_at(&elements[1], &entry_path.index(1))?;
        pairs.push((elements[0].clone(), nested));
    }
    Ok(pairs)
}

fn validate_special(record: &ConfigValue, path: &FieldPath) -> Result<Descriptor, ShapeViolation> {
    let pairs = expect_record(record, path)?;
    ensure_known_keys(pairs, &["special"], path)?;
    expect_one_of(
        record.get("special").unwrap_or(&ConfigValue::Null),
        &path.key("special"),
        &["deep"],
    )?;
    Ok(Descriptor::Special)
}

fn validate_template(record: &ConfigValue, path: &FieldPath) -> Result<Descriptor, ShapeViolation> {
    let pairs = expect_record(record, path)?;
    ensure_known_keys(pairs, &["template", "options"], path)?;

    let template = expect_str(
        record.get("template").unwrap_or(&ConfigValue::Null),
        &path.key("template"),
    )?
    .to_string();

    let options = match record.get("options") {
        None => None,
        Some(value) => Some(expect_record(value, &path.key("options"))?.to_vec()),
    };

    Ok(Descriptor::Template { template, options })
}

fn validate_value(record: &ConfigValue, path: &FieldPath) -> Result<Descriptor, ShapeViolation> {
    let pairs = expect_record(record, path)?;
    ensure_known_keys(pairs, &["value"], path)?;

    let payload = record.get("value").unwrap_or(&ConfigValue::Null);
    match payload {
        ConfigValue::Record(_) | ConfigValue::Sequence(_) => {
            Ok(Descriptor::Value(payload.clone()))
        }
        other => Err(ShapeViolation::new(
            path.key("value"),
            ViolationKind::InvalidField,
            format!("must be a record or sequence, found {}", other.kind()),
        )),
    }
}
