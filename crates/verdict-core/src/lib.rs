//! # verdict-core — Foundational Types for the Verdict Engine
//!
//! This crate is the bedrock of the Verdict validation engine. It defines
//! the dynamic configuration value model and the identity primitives that
//! every other crate in the workspace builds on; it depends on nothing
//! internal.
//!
//! ## Key Design Principles
//!
//! 1. **One value tree.** [`ConfigValue`] is the single representation for
//!    raw configuration handed to the engine — JSON-compatible leaves plus
//!    the two engine-specific leaves JSON cannot express: [`Callable`]
//!    references and opaque identity [`Token`]s.
//!
//! 2. **Identity is unforgeable.** `Token` and `Callable` compare by
//!    pointer identity only. There is no literal syntax and no structural
//!    equality; cloning shares the underlying allocation.
//!
//! 3. **Paths are typed.** [`FieldPath`] carries key and index segments
//!    rather than a pre-rendered string, so validators can extend paths
//!    cheaply while recursing and render them once at the reporting edge.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `verdict-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod callable;
pub mod path;
pub mod token;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use callable::Callable;
pub use path::{FieldPath, Segment};
pub use token::Token;
pub use value::{ConfigValue, ToJsonError};
