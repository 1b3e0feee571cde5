//! Rule abstractions: the matcher/transform pair, the document-level rule
//! trait, and applicability preconditions.
//!
//! Dispatch is explicit polymorphism throughout - trait objects over a
//! fixed capability pair - never reflection or registry scanning. A rule is
//! a pure function from (node, context) to (node, context); anything it
//! wants to remember across nodes goes through the [`ExecutionContext`].

use std::sync::Arc;

use regex::Regex;

use crate::context::ExecutionContext;
use crate::error::{RewriteError, StructuralViolation};
use crate::semantics::TypeTable;
use crate::tree::{
    props::split_profile, Document, DocumentBody, JavaNode, PomNode, PropsNode, TreeNode,
};
use crate::visit::{traverse, Traversal};

/// The matcher/transform pair over one node type.
///
/// `transform` is only invoked on nodes for which `matches` returned true.
/// Returning the node unchanged is the normal way to decline after a closer
/// look; returning an error discards this single rewrite attempt.
pub trait TreeRule<N: TreeNode> {
    fn matches(&self, node: &N) -> bool;
    fn transform(&self, node: N, ctx: &mut ExecutionContext) -> Result<N, StructuralViolation>;

    /// Post-order counterpart of `matches`: opt in to a second look at a
    /// node once its whole subtree has been rebuilt. Most rules do not
    /// need one.
    fn matches_post(&self, _node: &N) -> bool {
        false
    }

    /// Post-order counterpart of `transform`, invoked only when
    /// `matches_post` returned true for the rebuilt node.
    fn transform_post(&self, node: N, _ctx: &mut ExecutionContext) -> Result<N, StructuralViolation> {
        Ok(node)
    }
}

/// Matcher/transform pair over source trees, with read-only access to the
/// symbol table the parser resolved. Rules never re-resolve types.
pub trait SourceTreeRule: Send + Sync {
    fn matches(&self, node: &JavaNode, types: &TypeTable) -> bool;
    fn transform(
        &self,
        node: JavaNode,
        types: &TypeTable,
        ctx: &mut ExecutionContext,
    ) -> Result<JavaNode, StructuralViolation>;
}

/// A named, independently testable migration unit.
///
/// `apply` must leave documents of other kinds untouched; the driver calls
/// every active rule on every document.
pub trait Rule: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn precondition(&self) -> Option<&Precondition> {
        None
    }
    fn apply(
        &self,
        doc: &Document,
        ctx: &mut ExecutionContext,
        max_depth: usize,
    ) -> Result<Document, RewriteError>;
}

impl std::fmt::Debug for dyn Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name())
            .field("description", &self.description())
            .finish()
    }
}

/// Applicability test evaluated against a document before traversal.
///
/// A precondition that does not hold means the rule is skipped for that
/// document in that pass; it is never an error.
#[derive(Debug, Clone)]
pub enum Precondition {
    /// A config document defines a property whose bare (profile-stripped)
    /// key matches the pattern.
    HasProperty { key: Regex },
    /// A build descriptor declares the given plugin.
    HasPlugin {
        group_id: String,
        artifact_id: String,
    },
    /// A source document imports or resolves the given type.
    UsesType { fqn: String },
    /// All of the nested tests hold.
    AllOf(Vec<Precondition>),
}

impl Precondition {
    pub fn holds(&self, doc: &Document) -> bool {
        match (self, &doc.body) {
            (Precondition::HasProperty { key }, DocumentBody::Config(root)) => {
                let mut found = false;
                root.visit_preorder(&mut |node| {
                    if let Some(k) = node.key() {
                        let (_, bare) = split_profile(k);
                        found |= key.is_match(bare);
                    }
                });
                found
            }
            (
                Precondition::HasPlugin {
                    group_id,
                    artifact_id,
                },
                DocumentBody::Build(file),
            ) => {
                let mut found = false;
                file.root.visit_preorder(&mut |node| {
                    found |= crate::rules::pom::is_plugin(node, group_id, artifact_id);
                });
                found
            }
            (Precondition::UsesType { fqn }, DocumentBody::Source(file)) => {
                if file.types.mentions(fqn) {
                    return true;
                }
                let mut found = false;
                file.unit.visit_preorder(&mut |node| {
                    found |= node.import_path() == Some(fqn.as_str());
                });
                found
            }
            (Precondition::AllOf(tests), _) => tests.iter().all(|t| t.holds(doc)),
            // Kind mismatch: the test is about a document this is not.
            _ => false,
        }
    }
}

/// A rule over configuration-list documents.
pub struct ConfigRule<T: TreeRule<PropsNode> + Send + Sync> {
    name: String,
    description: String,
    precondition: Option<Precondition>,
    visitor: T,
}

impl<T: TreeRule<PropsNode> + Send + Sync> ConfigRule<T> {
    pub fn new(name: impl Into<String>, description: impl Into<String>, visitor: T) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            precondition: None,
            visitor,
        }
    }

    pub fn with_precondition(mut self, precondition: Precondition) -> Self {
        self.precondition = Some(precondition);
        self
    }
}

impl<T: TreeRule<PropsNode> + Send + Sync> Rule for ConfigRule<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn precondition(&self) -> Option<&Precondition> {
        self.precondition.as_ref()
    }

    fn apply(
        &self,
        doc: &Document,
        ctx: &mut ExecutionContext,
        max_depth: usize,
    ) -> Result<Document, RewriteError> {
        match &doc.body {
            DocumentBody::Config(root) => {
                let cfg = Traversal {
                    rule_name: &self.name,
                    origin: &doc.origin,
                    max_depth,
                };
                let (root, changed) = traverse(root.clone(), &self.visitor, ctx, &cfg)?;
                if changed {
                    Ok(Document::config(doc.origin.clone(), root))
                } else {
                    Ok(doc.clone())
                }
            }
            _ => Ok(doc.clone()),
        }
    }
}

/// A rule over build-descriptor documents.
pub struct BuildRule<T: TreeRule<PomNode> + Send + Sync> {
    name: String,
    description: String,
    precondition: Option<Precondition>,
    visitor: T,
}

impl<T: TreeRule<PomNode> + Send + Sync> BuildRule<T> {
    pub fn new(name: impl Into<String>, description: impl Into<String>, visitor: T) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            precondition: None,
            visitor,
        }
    }

    pub fn with_precondition(mut self, precondition: Precondition) -> Self {
        self.precondition = Some(precondition);
        self
    }
}

impl<T: TreeRule<PomNode> + Send + Sync> Rule for BuildRule<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn precondition(&self) -> Option<&Precondition> {
        self.precondition.as_ref()
    }

    fn apply(
        &self,
        doc: &Document,
        ctx: &mut ExecutionContext,
        max_depth: usize,
    ) -> Result<Document, RewriteError> {
        match &doc.body {
            DocumentBody::Build(file) => {
                let cfg = Traversal {
                    rule_name: &self.name,
                    origin: &doc.origin,
                    max_depth,
                };
                let (root, changed) = traverse(file.root.clone(), &self.visitor, ctx, &cfg)?;
                if changed {
                    let mut out = file.clone();
                    out.root = root;
                    Ok(Document::build(doc.origin.clone(), out))
                } else {
                    Ok(doc.clone())
                }
            }
            _ => Ok(doc.clone()),
        }
    }
}

/// A rule over language-source documents. Binds the document's symbol table
/// to the inner matcher/transform for the duration of one traversal.
pub struct SourceRule {
    name: String,
    description: String,
    precondition: Option<Precondition>,
    visitor: Arc<dyn SourceTreeRule>,
}

impl SourceRule {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        visitor: impl SourceTreeRule + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            precondition: None,
            visitor: Arc::new(visitor),
        }
    }

    pub fn with_precondition(mut self, precondition: Precondition) -> Self {
        self.precondition = Some(precondition);
        self
    }
}

struct Bound<'a> {
    visitor: &'a dyn SourceTreeRule,
    types: &'a TypeTable,
}

impl TreeRule<JavaNode> for Bound<'_> {
    fn matches(&self, node: &JavaNode) -> bool {
        self.visitor.matches(node, self.types)
    }

    fn transform(
        &self,
        node: JavaNode,
        ctx: &mut ExecutionContext,
    ) -> Result<JavaNode, StructuralViolation> {
        self.visitor.transform(node, self.types, ctx)
    }
}

impl Rule for SourceRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn precondition(&self) -> Option<&Precondition> {
        self.precondition.as_ref()
    }

    fn apply(
        &self,
        doc: &Document,
        ctx: &mut ExecutionContext,
        max_depth: usize,
    ) -> Result<Document, RewriteError> {
        match &doc.body {
            DocumentBody::Source(file) => {
                let cfg = Traversal {
                    rule_name: &self.name,
                    origin: &doc.origin,
                    max_depth,
                };
                let bound = Bound {
                    visitor: self.visitor.as_ref(),
                    types: &file.types,
                };
                let (unit, changed) = traverse(file.unit.clone(), &bound, ctx, &cfg)?;
                if changed {
                    let mut out = file.clone();
                    out.unit = unit;
                    Ok(Document::source(doc.origin.clone(), out))
                } else {
                    Ok(doc.clone())
                }
            }
            _ => Ok(doc.clone()),
        }
    }
}
