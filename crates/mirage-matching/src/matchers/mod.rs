//! Leaf pattern predicates used by the compiled field matchers.
//!
//! Each submodule wraps one pattern engine behind a small compile/evaluate
//! surface. Exact and regex matching are simple enough to live directly in
//! the compiled-pattern dispatcher (`models::field_matchers`).

pub(crate) mod glob;
pub(crate) mod json;
pub(crate) mod xml;
