//! # Extension Declaration Validation
//!
//! Extensions register new leaf types with the engine. A declaration is a
//! closed record: a required `name`, optional base/hook fields with arity
//! bounds on the supplied callables, and a rule list where every rule
//! must provide at least one of its `setup`/`validate` hooks.

use verdict_core::{ConfigValue, FieldPath};

use crate::fields::{
    ensure_known_keys, expect_arity, expect_record, expect_sequence, expect_str,
};
use crate::violation::{ShapeViolation, ViolationKind};

/// Validate an extension declaration.
///
/// # Errors
///
/// Returns the first violated constraint with its structural path.
pub fn validate_extension(raw: &ConfigValue) -> Result<(), ShapeViolation> {
    let root = FieldPath::root();
    let pairs = expect_record(raw, &root)?;
    ensure_known_keys(
        pairs,
        &["base", "name", "coerce", "pre", "messages", "rules"],
        &root,
    )?;

    raw.get("name")
        .ok_or_else(|| ShapeViolation::missing(&root, "name"))
        .and_then(|name| expect_str(name, &root.key("name")))?;

    if let Some(base) = raw.get("base") {
        let path = root.key("base");
        if base.as_record().is_none() && base.as_callable().is_none() {
            return Err(ShapeViolation::new(
                path,
                ViolationKind::InvalidField,
                format!("must be a record or callable, found {}", base.kind()),
            ));
        }
    }

    for hook in ["coerce", "pre"] {
        if let Some(value) = raw.get(hook) {
            expect_arity(value, &root.key(hook), 1, 3)?;
        }
    }

    if let Some(messages) = raw.get("messages") {
        expect_record(messages, &root.key("messages"))?;
    }

    if let Some(rules) = raw.get("rules") {
        let rules_path = root.key("rules");
        let items = expect_sequence(rules, &rules_path)?;
        for (index, rule) in items.iter().enumerate() {
            validate_rule(rule, &rules_path.index(index))?;
        }
    }

    Ok(())
}

fn validate_rule(rule: &ConfigValue, path: &FieldPath) -> Result<(), ShapeViolation> {
    let pairs = expect_record(rule, path)?;
    ensure_known_keys(pairs, &["name", "setup", "validate", "params"], path)?;

    rule.get("name")
        .ok_or_else(|| ShapeViolation::missing(path, "name"))
        .and_then(|name| expect_str(name, &path.key("name")))?;

    if let Some(setup) = rule.get("setup") {
        expect_arity(setup, &path.key("setup"), 1, 1)?;
    }
    if let Some(validate) = rule.get("validate") {
        expect_arity(validate, &path.key("validate"), 4, 4)?;
    }
    if let Some(params) = rule.get("params") {
        expect_record(params, &path.key("params"))?;
    }

    if rule.get("setup").is_none() && rule.get("validate").is_none() {
        return Err(ShapeViolation::new(
            path.clone(),
            ViolationKind::MissingAlternative,
            "must carry at least one of setup, validate",
        ));
    }

    Ok(())
}

/// Validate a registration list: each element is either an extension
/// record or a factory callable taking exactly one parameter. Records are
/// validated individually with [`validate_extension`] at registration;
/// factories cannot be inspected until invoked, so this check stops at
/// the element shape.
pub fn validate_extension_list(raw: &ConfigValue) -> Result<(), ShapeViolation> {
    let root = FieldPath::root();
    let items = expect_sequence(raw, &root)?;
    for (index, item) in items.iter().enumerate() {
        let path = root.index(index);
        match item {
            ConfigValue::Record(_) => {}
            ConfigValue::Callable(_) => {
                expect_arity(item, &path, 1, 1)?;
            }
            other => {
                return Err(ShapeViolation::new(
                    path,
                    ViolationKind::InvalidField,
                    format!("must be a record or callable, found {}", other.kind()),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdict_core::Callable;

    fn minimal() -> ConfigValue {
        ConfigValue::record([("name", ConfigValue::from("currency"))])
    }

    #[test]
    fn test_minimal_extension_accepted() {
        assert!(validate_extension(&minimal()).is_ok());
    }

    #[test]
    fn test_name_is_required() {
        let raw = ConfigValue::record([("messages", ConfigValue::record::<String, _>([]))]);
        let err = validate_extension(&raw).unwrap_err();
        assert_eq!(err.kind, ViolationKind::MissingField);
        assert_eq!(err.path.to_string(), "name");
    }

    #[test]
    fn test_coerce_arity_bounds() {
        let raw = ConfigValue::record([
            ("name", ConfigValue::from("currency")),
            ("coerce", ConfigValue::from(Callable::named("coerce", 2))),
        ]);
        assert!(validate_extension(&raw).is_ok());

        let raw = ConfigValue::record([
            ("name", ConfigValue::from("currency")),
            ("coerce", ConfigValue::from(Callable::named("coerce", 4))),
        ]);
        let err = validate_extension(&raw).unwrap_err();
        assert_eq!(err.kind, ViolationKind::ArityMismatch);
        assert_eq!(err.path.to_string(), "coerce");
        assert!(err.message.contains("between 1 and 3"));
    }

    #[test]
    fn test_rule_requires_setup_or_validate() {
        let rule = ConfigValue::record([("name", ConfigValue::from("min"))]);
        let raw = ConfigValue::record([
            ("name", ConfigValue::from("currency")),
            ("rules", ConfigValue::sequence([rule])),
        ]);
        let err = validate_extension(&raw).unwrap_err();
        assert_eq!(err.kind, ViolationKind::MissingAlternative);
        assert_eq!(err.path.to_string(), "rules[0]");
    }

    #[test]
    fn test_rule_exact_arities() {
        let rule = ConfigValue::record([
            ("name", ConfigValue::from("min")),
            ("setup", ConfigValue::from(Callable::named("setup", 1))),
            ("validate", ConfigValue::from(Callable::named("validate", 4))),
        ]);
        let raw = ConfigValue::record([
            ("name", ConfigValue::from("currency")),
            ("rules", ConfigValue::sequence([rule])),
        ]);
        assert!(validate_extension(&raw).is_ok());

        let bad_rule = ConfigValue::record([
            ("name", ConfigValue::from("min")),
            ("validate", ConfigValue::from(Callable::named("validate", 3))),
        ]);
        let raw = ConfigValue::record([
            ("name", ConfigValue::from("currency")),
            ("rules", ConfigValue::sequence([bad_rule])),
        ]);
        let err = validate_extension(&raw).unwrap_err();
        assert_eq!(err.path.to_string(), "rules[0].validate");
        assert!(err.message.contains("exactly 4"));
    }

    #[test]
    fn test_unknown_extension_key_rejected() {
        let raw = ConfigValue::record([
            ("name", ConfigValue::from("currency")),
            ("post", ConfigValue::from(Callable::new(1))),
        ]);
        let err = validate_extension(&raw).unwrap_err();
        assert_eq!(err.kind, ViolationKind::UnknownField);
    }

    #[test]
    fn test_extension_list_shapes() {
        let list = ConfigValue::sequence([
            minimal(),
            ConfigValue::from(Callable::named("factory", 1)),
        ]);
        assert!(validate_extension_list(&list).is_ok());

        let list = ConfigValue::sequence([ConfigValue::from("nope")]);
        let err = validate_extension_list(&list).unwrap_err();
        assert_eq!(err.path.to_string(), "[0]");

        let list = ConfigValue::sequence([ConfigValue::from(Callable::named("factory", 2))]);
        let err = validate_extension_list(&list).unwrap_err();
        assert_eq!(err.kind, ViolationKind::ArityMismatch);
    }
}
