//! Immutable, copy-on-write tree model for the three document kinds.
//!
//! Each kind (language source, build descriptor, flat configuration) has a
//! closed set of node variants in its own submodule. All node types share the
//! same capability set through [`TreeNode`]: enumerate children, rebuild with
//! replaced children, compare structurally, validate.
//!
//! ## Identity vs. structure
//! Every node carries a [`NodeId`] minted from a process-wide counter. The
//! `with_*` helpers on concrete nodes KEEP the id — a rewritten node is "the
//! same position, new content" — while constructors mint fresh ids.
//! Structural equality ignores ids entirely, so the change detector is
//! immune to identity churn from copy-on-write rebuilds.

pub mod java;
pub mod pom;
pub mod props;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::StructuralViolation;
use crate::semantics::TypeTable;

pub use java::JavaNode;
pub use pom::PomNode;
pub use props::PropsNode;

/// Stable structural identity of a node.
pub type NodeId = u64;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Mint a fresh node id.
pub fn next_node_id() -> NodeId {
    NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Shared capability set of all tree node types.
pub trait TreeNode: Sized + Clone {
    /// Immediate children, in source order.
    fn child_nodes(&self) -> Vec<&Self>;

    /// Rebuild this node by mapping each child in source order.
    ///
    /// Unchanged children are moved back as-is, so an edit at depth *d*
    /// re-creates only the *d* ancestors on the path to it. Returns whether
    /// any child reported a change.
    fn map_children<F>(self, f: &mut F) -> Result<(Self, bool), crate::error::RewriteError>
    where
        F: FnMut(Self) -> Result<(Self, bool), crate::error::RewriteError>;

    /// Structural equality, independent of node identity.
    fn structural_eq(&self, other: &Self) -> bool;

    /// Check this node's own invariants (names present, children variants
    /// legal for their slots). Shallow: children are assumed validated.
    fn validate(&self) -> Result<(), StructuralViolation>;

    /// Whether `replacement` may legally stand where `self` stands.
    ///
    /// Guards type-aware rewrites: a transform may change a node's shape,
    /// but not move it across slot families (an import cannot become a
    /// statement). Checked by the visitor before accepting a rewrite.
    fn slot_compatible(&self, replacement: &Self) -> bool;

    /// Short human-readable label for diagnostics ("call apply(..)",
    /// "element <goals>").
    fn label(&self) -> String;

    /// Pre-order read-only walk over this subtree.
    fn visit_preorder<'a>(&'a self, f: &mut impl FnMut(&'a Self)) {
        f(self);
        for child in self.child_nodes() {
            child.visit_preorder(f);
        }
    }

    /// Count nodes in this subtree matching a predicate.
    fn count_matching(&self, pred: impl Fn(&Self) -> bool) -> usize {
        let mut n = 0;
        self.visit_preorder(&mut |node| {
            if pred(node) {
                n += 1;
            }
        });
        n
    }
}

/// The three structured-document models the engine operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Language-source AST (Java-like), built by an external parser.
    Source,
    /// Hierarchical build descriptor (Maven POM).
    Build,
    /// Flat key-value configuration list (.properties).
    Config,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Source => write!(f, "source"),
            DocumentKind::Build => write!(f, "build-descriptor"),
            DocumentKind::Config => write!(f, "config"),
        }
    }
}

/// A source tree plus the symbol table the parser resolved for it.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub unit: JavaNode,
    pub types: Arc<TypeTable>,
}

impl SourceFile {
    pub fn new(unit: JavaNode, types: TypeTable) -> Self {
        Self {
            unit,
            types: Arc::new(types),
        }
    }
}

/// A build-descriptor tree plus the XML declaration line, if the file had one.
#[derive(Debug, Clone)]
pub struct PomFile {
    pub declaration: Option<String>,
    pub root: PomNode,
}

impl PomFile {
    pub fn new(root: PomNode) -> Self {
        Self {
            declaration: None,
            root,
        }
    }
}

/// Kind-tagged document body.
#[derive(Debug, Clone)]
pub enum DocumentBody {
    Source(SourceFile),
    Build(PomFile),
    Config(PropsNode),
}

/// One parsed unit: a root tree, a source identity, a kind tag.
///
/// Immutable once parsed; a rule that changes anything produces a whole new
/// `Document`.
#[derive(Debug, Clone)]
pub struct Document {
    pub origin: String,
    pub body: DocumentBody,
}

impl Document {
    pub fn source(origin: impl Into<String>, file: SourceFile) -> Self {
        Self {
            origin: origin.into(),
            body: DocumentBody::Source(file),
        }
    }

    pub fn build(origin: impl Into<String>, file: PomFile) -> Self {
        Self {
            origin: origin.into(),
            body: DocumentBody::Build(file),
        }
    }

    pub fn config(origin: impl Into<String>, root: PropsNode) -> Self {
        Self {
            origin: origin.into(),
            body: DocumentBody::Config(root),
        }
    }

    pub fn kind(&self) -> DocumentKind {
        match &self.body {
            DocumentBody::Source(_) => DocumentKind::Source,
            DocumentBody::Build(_) => DocumentKind::Build,
            DocumentBody::Config(_) => DocumentKind::Config,
        }
    }

    /// Structural equality of the document bodies (origins must match too;
    /// comparing documents from different origins is a caller bug).
    pub fn structural_eq(&self, other: &Document) -> bool {
        if self.origin != other.origin {
            return false;
        }
        match (&self.body, &other.body) {
            (DocumentBody::Source(a), DocumentBody::Source(b)) => a.unit.structural_eq(&b.unit),
            (DocumentBody::Build(a), DocumentBody::Build(b)) => {
                a.declaration == b.declaration && a.root.structural_eq(&b.root)
            }
            (DocumentBody::Config(a), DocumentBody::Config(b)) => a.structural_eq(b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_ids_are_unique() {
        let a = next_node_id();
        let b = next_node_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_document_kind_display() {
        assert_eq!(DocumentKind::Build.to_string(), "build-descriptor");
        assert_eq!(DocumentKind::Config.to_string(), "config");
        assert_eq!(DocumentKind::Source.to_string(), "source");
    }
}
