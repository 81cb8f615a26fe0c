//! Core error taxonomy.
//!
//! Defined here so every crate in the workspace can classify failures the
//! same way: entity lookups that miss map to `NotFound`, boundary checks
//! reject with `Validation` before anything is persisted, and role gates
//! refuse with `RoleDenied`. Mail-delivery and file-delete failures have no
//! variant here; both are logged and swallowed.

use thiserror::Error;

/// Errors surfaced by the grading and targeting core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An entity id was looked up and does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A boundary validation failed; no state was mutated.
    #[error("validation failed: {0}")]
    Validation(String),

    /// An uploaded filename has an extension outside the allow-list.
    #[error("file extension not allowed: {0}")]
    InvalidExtension(String),

    /// The current viewer does not hold the required role.
    #[error("requires {required} role")]
    RoleDenied { required: crate::model::Role },
}

impl CoreError {
    /// Shorthand for a `NotFound` with a displayable id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        CoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Returns `true` if this error should render as a 404-equivalent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let e = CoreError::not_found("quiz", 42);
        assert_eq!(e.to_string(), "quiz not found: 42");
        assert!(e.is_not_found());
    }

    #[test]
    fn validation_is_not_not_found() {
        let e = CoreError::Validation("missing title".into());
        assert!(!e.is_not_found());
    }
}
