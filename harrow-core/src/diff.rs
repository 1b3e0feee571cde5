//! Change detection between a document and its rewritten candidate.
//!
//! Structural equality only: copy-on-write rebuilding churns node ids on
//! every touched path, so identity is deliberately ignored. A document that
//! is structurally identical to its input is "unchanged" and never emitted.

use crate::tree::Document;

/// Per-document outcome of one migration.
#[derive(Debug, Clone)]
pub enum ChangeSet {
    Unchanged,
    Changed {
        document: Document,
        /// Names of the rules that touched the document, in first-touch order.
        rules: Vec<String>,
    },
}

impl ChangeSet {
    pub fn is_changed(&self) -> bool {
        matches!(self, ChangeSet::Changed { .. })
    }

    pub fn document(&self) -> Option<&Document> {
        match self {
            ChangeSet::Changed { document, .. } => Some(document),
            ChangeSet::Unchanged => None,
        }
    }

    pub fn rules(&self) -> &[String] {
        match self {
            ChangeSet::Changed { rules, .. } => rules,
            ChangeSet::Unchanged => &[],
        }
    }
}

/// Compare `after` against `before` structurally.
pub fn diff(before: &Document, after: &Document, rules: Vec<String>) -> ChangeSet {
    if before.structural_eq(after) {
        ChangeSet::Unchanged
    } else {
        ChangeSet::Changed {
            document: after.clone(),
            rules,
        }
    }
}
