//! Error taxonomy for the migration engine.
//!
//! Activation-time errors (bad rule configuration) are fatal for a run and
//! surface before any document is touched. Rewrite-time errors are scoped to
//! a single rule application on a single document and never stop the batch.

use thiserror::Error;

/// A malformed node was constructed, or a rebuild produced one.
///
/// Raised at construction time by the tree model, never silently accepted.
/// Inside a traversal this aborts only the single rewrite attempt that
/// produced the bad node.
#[derive(Error, Debug, Clone)]
#[error("structural violation: {detail}")]
pub struct StructuralViolation {
    pub detail: String,
}

impl StructuralViolation {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Errors raised while applying a rule to one document.
#[derive(Error, Debug)]
pub enum RewriteError {
    /// A transform's output failed structural validation. Recovered by the
    /// visitor (original node kept); carried here only for logging.
    #[error("invalid rewrite by rule '{rule}' at {node}: {violation}")]
    InvalidRewrite {
        rule: String,
        node: String,
        violation: StructuralViolation,
    },
    /// Runaway self-replacement: recursion exceeded the configured depth
    /// bound. Aborts the current rule application on this document.
    #[error("traversal overflow in '{origin}': depth bound {max_depth} exceeded applying rule '{rule}'")]
    TraversalOverflow {
        origin: String,
        rule: String,
        max_depth: usize,
    },
    #[error(transparent)]
    Structural(#[from] StructuralViolation),
}

/// Errors raised while resolving rule names against the catalog.
///
/// These indicate a broken configuration, not a broken input, and fail the
/// whole run before any document is processed.
#[derive(Error, Debug)]
pub enum ActivationError {
    #[error("unknown rule '{0}'")]
    UnknownRule(String),
    #[error("cyclic composite: {}", .cycle.join(" -> "))]
    CyclicComposite { cycle: Vec<String> },
    #[error("rule '{0}' is already registered")]
    DuplicateRule(String),
    #[error("invalid rule manifest: {0}")]
    Manifest(String),
}

/// Errors raised by the bundled text adapters.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed build descriptor: {0}")]
    Xml(String),
    #[error(transparent)]
    Structural(#[from] StructuralViolation),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cyclic_composite_names_cycle() {
        let err = ActivationError::CyclicComposite {
            cycle: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "cyclic composite: a -> b -> a");
    }

    #[test]
    fn test_structural_violation_message() {
        let v = StructuralViolation::new("element with empty name");
        assert_eq!(
            v.to_string(),
            "structural violation: element with empty name"
        );
    }
}
