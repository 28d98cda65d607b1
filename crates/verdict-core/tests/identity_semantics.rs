//! Integration test: identity semantics across the value model.
//!
//! Tokens and callables embedded in configuration trees must keep
//! pointer-identity equality through cloning and collection membership —
//! a cloned tree shares the same tokens, and structurally identical trees
//! built from fresh tokens never compare equal.

use verdict_core::{Callable, ConfigValue, Token};

#[test]
fn test_cloned_tree_shares_tokens() {
    let token = Token::labeled("approved");
    let tree = ConfigValue::record([("default", ConfigValue::from(token.clone()))]);
    let clone = tree.clone();

    assert_eq!(tree, clone);
    let original = tree.get("default").and_then(ConfigValue::as_token).unwrap();
    let copied = clone.get("default").and_then(ConfigValue::as_token).unwrap();
    assert!(original.same(copied));
}

#[test]
fn test_fresh_tokens_break_structural_equality() {
    let a = ConfigValue::record([("default", ConfigValue::from(Token::labeled("approved")))]);
    let b = ConfigValue::record([("default", ConfigValue::from(Token::labeled("approved")))]);
    assert_ne!(a, b);
}

#[test]
fn test_callable_identity_in_sequences() {
    let hook = Callable::named("setup", 1);
    let seq = ConfigValue::sequence([
        ConfigValue::from(hook.clone()),
        ConfigValue::from(hook.clone()),
    ]);
    let items = seq.as_sequence().unwrap();
    assert_eq!(items[0], items[1]);
    assert_ne!(items[0], ConfigValue::from(Callable::named("setup", 1)));
}

#[test]
fn test_json_sourced_config_has_no_identity_leaves() {
    let json: serde_json::Value = serde_json::from_str(
        r#"{"convert": true, "presence": "required", "stripUnknown": {"arrays": true}}"#,
    )
    .unwrap();
    let config = ConfigValue::from(json);
    assert!(config.to_json().is_ok());
    assert_eq!(
        config.get("presence").and_then(ConfigValue::as_str),
        Some("required")
    );
}
