//! Read-only semantic queries over a source tree.
//!
//! The external parser resolves symbols while building a source tree and
//! hands the result over as a [`TypeTable`]: node id → fully-qualified type,
//! plus declared supertype edges. Rules query this table; they never attempt
//! to re-resolve types themselves.

use std::collections::HashMap;

use crate::tree::NodeId;

/// Symbol information for one source document, keyed by node identity.
///
/// Because rewrites keep the node id when they replace content at a position,
/// a renamed invocation still resolves to the type recorded for the original
/// node.
#[derive(Debug, Default, Clone)]
pub struct TypeTable {
    node_types: HashMap<NodeId, String>,
    supertypes: HashMap<String, Vec<String>>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the fully-qualified type of an expression or annotation node.
    pub fn with_node_type(mut self, id: NodeId, fqn: impl Into<String>) -> Self {
        self.node_types.insert(id, fqn.into());
        self
    }

    /// Record a direct supertype edge (extends/implements).
    pub fn with_supertype(mut self, fqn: impl Into<String>, supertype: impl Into<String>) -> Self {
        self.supertypes
            .entry(fqn.into())
            .or_default()
            .push(supertype.into());
        self
    }

    /// Fully-qualified type of the given node, if the parser resolved one.
    pub fn type_of(&self, id: NodeId) -> Option<&str> {
        self.node_types.get(&id).map(String::as_str)
    }

    /// Whether any node in the document resolved to the given type.
    pub fn mentions(&self, fqn: &str) -> bool {
        self.node_types.values().any(|t| t == fqn)
    }

    /// Reflexive, transitive subtype check over the recorded edges.
    pub fn is_subtype_of(&self, fqn: &str, ancestor: &str) -> bool {
        if fqn == ancestor {
            return true;
        }
        let mut queue: Vec<&str> = vec![fqn];
        let mut seen: Vec<&str> = Vec::new();
        while let Some(ty) = queue.pop() {
            if seen.contains(&ty) {
                continue;
            }
            seen.push(ty);
            if let Some(supers) = self.supertypes.get(ty) {
                for s in supers {
                    if s == ancestor {
                        return true;
                    }
                    queue.push(s.as_str());
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtype_reflexive() {
        let table = TypeTable::new();
        assert!(table.is_subtype_of("io.smallrye.mutiny.Multi", "io.smallrye.mutiny.Multi"));
    }

    #[test]
    fn test_subtype_transitive() {
        let table = TypeTable::new()
            .with_supertype("a.Impl", "a.Mid")
            .with_supertype("a.Mid", "a.Base");
        assert!(table.is_subtype_of("a.Impl", "a.Base"));
        assert!(!table.is_subtype_of("a.Base", "a.Impl"));
    }

    #[test]
    fn test_subtype_cycle_terminates() {
        let table = TypeTable::new()
            .with_supertype("a.A", "a.B")
            .with_supertype("a.B", "a.A");
        assert!(!table.is_subtype_of("a.A", "a.C"));
    }

    #[test]
    fn test_type_of_unknown_node() {
        let table = TypeTable::new().with_node_type(7, "java.lang.String");
        assert_eq!(table.type_of(7), Some("java.lang.String"));
        assert_eq!(table.type_of(8), None);
    }
}
