//! Flat key-value configuration list (.properties shape).
//!
//! The tree is one level deep: a `File` whose entries are properties,
//! comments, and blank lines in source order. Layout details (separator
//! style, comment text) are kept on the nodes so a round trip through the
//! adapter preserves untouched lines byte-for-byte.
//!
//! Keys may carry a profile prefix (`%dev.quarkus.http.port`); the profile
//! helpers here are what the profile-scoped property rules build on.

use crate::error::{RewriteError, StructuralViolation};
use crate::tree::{next_node_id, NodeId, TreeNode};

/// Node variants of a configuration-list document.
#[derive(Debug, Clone)]
pub enum PropsNode {
    /// Document root; children are entries, comments, and blanks.
    File { id: NodeId, entries: Vec<PropsNode> },
    /// One `key<separator>value` line. The separator is stored verbatim
    /// (`=`, ` = `, `: `, ...).
    Entry {
        id: NodeId,
        key: String,
        separator: String,
        value: String,
    },
    /// A comment line, stored verbatim including the leading `#` or `!`.
    Comment { id: NodeId, text: String },
    /// An empty line.
    Blank { id: NodeId },
}

impl PropsNode {
    pub fn file(entries: Vec<PropsNode>) -> Result<Self, StructuralViolation> {
        let node = PropsNode::File {
            id: next_node_id(),
            entries,
        };
        node.validate()?;
        Ok(node)
    }

    pub fn entry(key: impl Into<String>, value: impl Into<String>) -> Result<Self, StructuralViolation> {
        Self::entry_with_separator(key, "=", value)
    }

    pub fn entry_with_separator(
        key: impl Into<String>,
        separator: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, StructuralViolation> {
        let node = PropsNode::Entry {
            id: next_node_id(),
            key: key.into(),
            separator: separator.into(),
            value: value.into(),
        };
        node.validate()?;
        Ok(node)
    }

    pub fn comment(text: impl Into<String>) -> Self {
        PropsNode::Comment {
            id: next_node_id(),
            text: text.into(),
        }
    }

    pub fn blank() -> Self {
        PropsNode::Blank { id: next_node_id() }
    }

    pub fn id(&self) -> NodeId {
        match self {
            PropsNode::File { id, .. }
            | PropsNode::Entry { id, .. }
            | PropsNode::Comment { id, .. }
            | PropsNode::Blank { id } => *id,
        }
    }

    /// Entry key, if this is an entry.
    pub fn key(&self) -> Option<&str> {
        match self {
            PropsNode::Entry { key, .. } => Some(key),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            PropsNode::Entry { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Replace the key, keeping identity and layout.
    pub fn with_key(self, new_key: impl Into<String>) -> Result<Self, StructuralViolation> {
        match self {
            PropsNode::Entry {
                id,
                separator,
                value,
                ..
            } => {
                let node = PropsNode::Entry {
                    id,
                    key: new_key.into(),
                    separator,
                    value,
                };
                node.validate()?;
                Ok(node)
            }
            other => Err(StructuralViolation::new(format!(
                "with_key on non-entry node {}",
                other.label()
            ))),
        }
    }

    /// Replace the value, keeping identity and layout.
    pub fn with_value(self, new_value: impl Into<String>) -> Result<Self, StructuralViolation> {
        match self {
            PropsNode::Entry {
                id, key, separator, ..
            } => Ok(PropsNode::Entry {
                id,
                key,
                separator,
                value: new_value.into(),
            }),
            other => Err(StructuralViolation::new(format!(
                "with_value on non-entry node {}",
                other.label()
            ))),
        }
    }

    /// Append an entry to a file root, keeping the root's identity.
    pub fn with_appended(self, entry: PropsNode) -> Result<Self, StructuralViolation> {
        match self {
            PropsNode::File { id, mut entries } => {
                entries.push(entry);
                let node = PropsNode::File { id, entries };
                node.validate()?;
                Ok(node)
            }
            other => Err(StructuralViolation::new(format!(
                "with_appended on non-file node {}",
                other.label()
            ))),
        }
    }

    /// Drop entries matching the predicate from a file root.
    pub fn without_entries(self, pred: impl Fn(&PropsNode) -> bool) -> Result<Self, StructuralViolation> {
        match self {
            PropsNode::File { id, entries } => Ok(PropsNode::File {
                id,
                entries: entries.into_iter().filter(|e| !pred(e)).collect(),
            }),
            other => Err(StructuralViolation::new(format!(
                "without_entries on non-file node {}",
                other.label()
            ))),
        }
    }
}

/// Split a profile-prefixed key: `%dev.quarkus.foo` → (`Some("dev")`,
/// `quarkus.foo`); plain keys map to (`None`, key).
pub fn split_profile(key: &str) -> (Option<&str>, &str) {
    if let Some(rest) = key.strip_prefix('%') {
        if let Some(dot) = rest.find('.') {
            return (Some(&rest[..dot]), &rest[dot + 1..]);
        }
    }
    (None, key)
}

/// Re-attach a profile prefix to a bare key.
pub fn join_profile(profile: Option<&str>, key: &str) -> String {
    match profile {
        Some(p) => format!("%{}.{}", p, key),
        None => key.to_string(),
    }
}

impl TreeNode for PropsNode {
    fn child_nodes(&self) -> Vec<&Self> {
        match self {
            PropsNode::File { entries, .. } => entries.iter().collect(),
            _ => Vec::new(),
        }
    }

    fn map_children<F>(self, f: &mut F) -> Result<(Self, bool), RewriteError>
    where
        F: FnMut(Self) -> Result<(Self, bool), RewriteError>,
    {
        match self {
            PropsNode::File { id, entries } => {
                let mut changed = false;
                let mut mapped = Vec::with_capacity(entries.len());
                for entry in entries {
                    let (node, c) = f(entry)?;
                    changed |= c;
                    mapped.push(node);
                }
                Ok((PropsNode::File { id, entries: mapped }, changed))
            }
            leaf => Ok((leaf, false)),
        }
    }

    fn structural_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropsNode::File { entries: a, .. }, PropsNode::File { entries: b, .. }) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.structural_eq(y))
            }
            (
                PropsNode::Entry {
                    key: k1,
                    separator: s1,
                    value: v1,
                    ..
                },
                PropsNode::Entry {
                    key: k2,
                    separator: s2,
                    value: v2,
                    ..
                },
            ) => k1 == k2 && s1 == s2 && v1 == v2,
            (PropsNode::Comment { text: a, .. }, PropsNode::Comment { text: b, .. }) => a == b,
            (PropsNode::Blank { .. }, PropsNode::Blank { .. }) => true,
            _ => false,
        }
    }

    fn validate(&self) -> Result<(), StructuralViolation> {
        match self {
            PropsNode::File { entries, .. } => {
                for entry in entries {
                    if matches!(entry, PropsNode::File { .. }) {
                        return Err(StructuralViolation::new(
                            "configuration file nested inside configuration file",
                        ));
                    }
                }
                Ok(())
            }
            PropsNode::Entry { key, .. } => {
                if key.trim().is_empty() {
                    return Err(StructuralViolation::new("property entry with empty key"));
                }
                if key.contains('\n') {
                    return Err(StructuralViolation::new("property key spans lines"));
                }
                Ok(())
            }
            PropsNode::Comment { text, .. } => {
                if text.contains('\n') {
                    return Err(StructuralViolation::new("comment spans lines"));
                }
                Ok(())
            }
            PropsNode::Blank { .. } => Ok(()),
        }
    }

    fn slot_compatible(&self, replacement: &Self) -> bool {
        // The root must stay a file; line-level nodes are interchangeable.
        matches!(self, PropsNode::File { .. }) == matches!(replacement, PropsNode::File { .. })
    }

    fn label(&self) -> String {
        match self {
            PropsNode::File { entries, .. } => format!("config file ({} lines)", entries.len()),
            PropsNode::Entry { key, .. } => format!("property '{}'", key),
            PropsNode::Comment { .. } => "comment".to_string(),
            PropsNode::Blank { .. } => "blank line".to_string(),
        }
    }
}
