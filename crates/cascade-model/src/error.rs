//! Error types for model integrity checks.

use thiserror::Error;

use crate::OptionContext;

/// A broken invariant found in a [`crate::Store`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// Two relations share the same `(parent, parent_value, child)` triple.
    #[error("duplicate relation for {parent}={parent_value} -> {child}")]
    DuplicateRelation {
        parent: String,
        parent_value: String,
        child: String,
    },

    /// An option list holds two entries whose value or label collide.
    #[error("duplicate option '{label}' in {context}")]
    DuplicateOption { context: OptionContext, label: String },
}

/// Result type for model integrity checks.
pub type Result<T> = std::result::Result<T, ModelError>;
