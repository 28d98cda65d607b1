//! # Callable References
//!
//! A [`Callable`] stands in for a host-supplied function inside a
//! configuration tree. The engine core never invokes callables — it
//! validates their presence and declared parameter count (extension
//! hooks carry exact or bounded arity requirements).
//!
//! Like [`Token`](crate::Token), a callable compares by identity: the
//! name and arity are metadata, not equality inputs.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A reference to a host-supplied function with a declared arity.
#[derive(Clone)]
pub struct Callable {
    inner: Arc<CallableInner>,
}

struct CallableInner {
    name: Option<String>,
    arity: usize,
}

impl Callable {
    /// Create an anonymous callable reference declaring `arity` parameters.
    pub fn new(arity: usize) -> Self {
        Self {
            inner: Arc::new(CallableInner { name: None, arity }),
        }
    }

    /// Create a named callable reference declaring `arity` parameters.
    pub fn named(name: impl Into<String>, arity: usize) -> Self {
        Self {
            inner: Arc::new(CallableInner {
                name: Some(name.into()),
                arity,
            }),
        }
    }

    /// Declared parameter count.
    pub fn arity(&self) -> usize {
        self.inner.arity
    }

    /// Diagnostic name, if one was supplied.
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Callable {}

impl Hash for Callable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.inner) as usize).hash(state);
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.name {
            Some(name) => write!(f, "{name}/{}", self.inner.arity),
            None => write!(f, "callable/{}", self.inner.arity),
        }
    }
}
