//! # Opaque Identity Tokens
//!
//! A [`Token`] is the engine's canonical-value primitive: a unique value
//! compared only by identity, never by structural content. Leaf types use
//! tokens as the internal representation that heterogeneous external
//! inputs resolve to.
//!
//! ## Identity Invariant
//!
//! The inner allocation is private and the only constructors are
//! [`Token::new`] and [`Token::labeled`]. Two separately constructed
//! tokens are never equal, even with identical labels — there is no way
//! to forge a token from data. Cloning shares the allocation, which is
//! what makes a clone compare equal: the map, the allow-list, and
//! validated output all hold the same token, not copies of it.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// An opaque identity token.
///
/// The optional label exists purely for diagnostics: it appears in
/// `Display` output and error enumerations but never participates in
/// equality or hashing.
#[derive(Clone)]
pub struct Token {
    inner: Arc<TokenInner>,
}

struct TokenInner {
    label: Option<String>,
}

impl Token {
    /// Create a new unlabeled token, distinct from every existing token.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(TokenInner { label: None }),
        }
    }

    /// Create a new token carrying a diagnostic label.
    ///
    /// The label has no effect on identity: two tokens labeled `"one"`
    /// are still distinct values.
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(TokenInner {
                label: Some(label.into()),
            }),
        }
    }

    /// The diagnostic label, if one was supplied at construction.
    pub fn label(&self) -> Option<&str> {
        self.inner.label.as_deref()
    }

    /// Whether two handles refer to the same token.
    ///
    /// Equivalent to `==`; provided for call sites where the identity
    /// comparison should read explicitly.
    pub fn same(&self, other: &Token) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Token {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.inner) as usize).hash(state);
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.label {
            Some(label) => write!(f, "Token({label})"),
            None => write!(f, "Token(?)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_clone_is_identical() {
        let token = Token::labeled("one");
        let clone = token.clone();
        assert_eq!(token, clone);
        assert!(token.same(&clone));
    }

    #[test]
    fn test_same_label_distinct_identity() {
        let a = Token::labeled("one");
        let b = Token::labeled("one");
        assert_ne!(a, b);
        assert!(!a.same(&b));
    }

    #[test]
    fn test_unlabeled_tokens_distinct() {
        assert_ne!(Token::new(), Token::new());
    }

    #[test]
    fn test_hash_follows_identity() {
        let a = Token::labeled("x");
        let b = Token::labeled("x");
        let mut set = HashSet::new();
        set.insert(a.clone());
        set.insert(a.clone());
        set.insert(b);
        assert_eq!(set.len(), 2);
        assert!(set.contains(&a));
    }

    #[test]
    fn test_display_uses_label() {
        assert_eq!(Token::labeled("two").to_string(), "Token(two)");
        assert_eq!(Token::new().to_string(), "Token(?)");
    }
}
