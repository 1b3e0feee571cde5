//! Source-tree rule primitives.
//!
//! These carry executable matching logic: deciding whether `.apply(fn)` is
//! the deprecated pipeline-stage call or somebody's unrelated `apply`
//! requires the receiver's resolved type, which comes from the document's
//! [`TypeTable`]. Rules read the table; they never resolve types themselves.

use crate::context::ExecutionContext;
use crate::error::StructuralViolation;
use crate::rule::SourceTreeRule;
use crate::semantics::TypeTable;
use crate::tree::JavaNode;

fn simple_name(fqn: &str) -> &str {
    fqn.rsplit('.').next().unwrap_or(fqn)
}

/// Rename invocations of a method on a specific receiver type (or any of
/// its subtypes).
pub struct RenameMethod {
    pub receiver_type: String,
    pub method_name: String,
    pub new_name: String,
}

impl SourceTreeRule for RenameMethod {
    fn matches(&self, node: &JavaNode, types: &TypeTable) -> bool {
        if node.simple_name() != Some(self.method_name.as_str()) {
            return false;
        }
        let Some(select) = node.invocation_select() else {
            return false;
        };
        types
            .type_of(select.id())
            .is_some_and(|ty| types.is_subtype_of(ty, &self.receiver_type))
    }

    fn transform(
        &self,
        node: JavaNode,
        _types: &TypeTable,
        _ctx: &mut ExecutionContext,
    ) -> Result<JavaNode, StructuralViolation> {
        node.with_method_name(&self.new_name)
    }
}

/// Move every reference to one type onto another: the import, annotations,
/// and field/parameter type names.
///
/// References are confirmed against the symbol table where the parser
/// resolved them; where it did not, the rewrite of the document's own
/// import earlier in the same pre-order pass vouches for the simple name
/// (the "import already handled" flag in the execution context).
pub struct ChangeType {
    old_fqn: String,
    new_fqn: String,
    old_simple: String,
    new_simple: String,
    flag: String,
}

impl ChangeType {
    pub fn new(old_fqn: impl Into<String>, new_fqn: impl Into<String>) -> Self {
        let old_fqn = old_fqn.into();
        let new_fqn = new_fqn.into();
        let old_simple = simple_name(&old_fqn).to_string();
        let new_simple = simple_name(&new_fqn).to_string();
        let flag = format!("change-type.import-renamed.{}", old_fqn);
        Self {
            old_fqn,
            new_fqn,
            old_simple,
            new_simple,
            flag,
        }
    }

    fn names_old_type(&self, name: &str) -> bool {
        name == self.old_fqn || name == self.old_simple
    }

    /// A reference is rewritten when the table resolves it to the old type,
    /// or when it is unresolved but this document's import was just
    /// repointed.
    fn confirmed(&self, id: u64, types: &TypeTable, ctx: &ExecutionContext) -> bool {
        match types.type_of(id) {
            Some(ty) => ty == self.old_fqn,
            None => ctx.flag(&self.flag),
        }
    }

    fn replacement_for(&self, name: &str) -> &str {
        if name == self.old_fqn {
            &self.new_fqn
        } else {
            &self.new_simple
        }
    }
}

impl SourceTreeRule for ChangeType {
    fn matches(&self, node: &JavaNode, types: &TypeTable) -> bool {
        match node {
            JavaNode::Import { path, .. } => path == &self.old_fqn,
            JavaNode::Annotation { id, name, .. } => {
                self.names_old_type(name) || types.type_of(*id) == Some(self.old_fqn.as_str())
            }
            JavaNode::Field { type_name, .. } | JavaNode::Param { type_name, .. } => {
                self.names_old_type(type_name)
            }
            _ => false,
        }
    }

    fn transform(
        &self,
        node: JavaNode,
        types: &TypeTable,
        ctx: &mut ExecutionContext,
    ) -> Result<JavaNode, StructuralViolation> {
        match &node {
            JavaNode::Import { .. } => {
                ctx.set_flag(self.flag.as_str());
                node.with_import_path(&self.new_fqn)
            }
            JavaNode::Annotation { id, name, .. } => {
                if self.confirmed(*id, types, ctx) {
                    let replacement = self.replacement_for(name).to_string();
                    node.with_annotation_name(replacement)
                } else {
                    Ok(node)
                }
            }
            JavaNode::Field { id, type_name, .. } | JavaNode::Param { id, type_name, .. } => {
                if self.confirmed(*id, types, ctx) {
                    let replacement = self.replacement_for(type_name).to_string();
                    node.with_type_name(replacement)
                } else {
                    Ok(node)
                }
            }
            _ => Ok(node),
        }
    }
}
