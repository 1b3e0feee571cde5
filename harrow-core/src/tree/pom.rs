//! Hierarchical build-descriptor tree (Maven POM shape).
//!
//! Elements own their attributes and children; text is kept verbatim,
//! including the whitespace runs between elements, so untouched regions of a
//! descriptor serialize back unchanged. Helpers here mirror the usual tag
//! navigation rules need: find a child element by name, read the text
//! content of a leaf tag, rebuild with an added or replaced child.

use crate::error::{RewriteError, StructuralViolation};
use crate::tree::{next_node_id, NodeId, TreeNode};

/// Node variants of a build-descriptor document.
#[derive(Debug, Clone)]
pub enum PomNode {
    Element {
        id: NodeId,
        name: String,
        attributes: Vec<(String, String)>,
        children: Vec<PomNode>,
    },
    /// Raw character data, unescaped. Whitespace-only runs are kept so
    /// serialization preserves layout.
    Text { id: NodeId, content: String },
    Comment { id: NodeId, text: String },
}

impl PomNode {
    pub fn element(name: impl Into<String>, children: Vec<PomNode>) -> Result<Self, StructuralViolation> {
        Self::element_with_attrs(name, Vec::new(), children)
    }

    pub fn element_with_attrs(
        name: impl Into<String>,
        attributes: Vec<(String, String)>,
        children: Vec<PomNode>,
    ) -> Result<Self, StructuralViolation> {
        let node = PomNode::Element {
            id: next_node_id(),
            name: name.into(),
            attributes,
            children,
        };
        node.validate()?;
        Ok(node)
    }

    /// Leaf element wrapping a single text value: `<name>value</name>`.
    pub fn tag(name: impl Into<String>, value: impl Into<String>) -> Result<Self, StructuralViolation> {
        Self::element(name, vec![PomNode::text(value)])
    }

    pub fn text(content: impl Into<String>) -> Self {
        PomNode::Text {
            id: next_node_id(),
            content: content.into(),
        }
    }

    pub fn comment(text: impl Into<String>) -> Self {
        PomNode::Comment {
            id: next_node_id(),
            text: text.into(),
        }
    }

    pub fn id(&self) -> NodeId {
        match self {
            PomNode::Element { id, .. } | PomNode::Text { id, .. } | PomNode::Comment { id, .. } => *id,
        }
    }

    /// Element name, if this is an element.
    pub fn name(&self) -> Option<&str> {
        match self {
            PomNode::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_element_named(&self, tag: &str) -> bool {
        self.name() == Some(tag)
    }

    /// Element children only, skipping text and comments.
    pub fn child_elements(&self) -> Vec<&PomNode> {
        match self {
            PomNode::Element { children, .. } => children
                .iter()
                .filter(|c| matches!(c, PomNode::Element { .. }))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// First child element with the given name.
    pub fn child_element(&self, tag: &str) -> Option<&PomNode> {
        self.child_elements().into_iter().find(|c| c.is_element_named(tag))
    }

    /// Concatenated text content of this element's direct text children.
    pub fn text_content(&self) -> Option<String> {
        match self {
            PomNode::Element { children, .. } => {
                let mut out = String::new();
                for child in children {
                    if let PomNode::Text { content, .. } = child {
                        out.push_str(content);
                    }
                }
                if out.is_empty() {
                    None
                } else {
                    Some(out)
                }
            }
            _ => None,
        }
    }

    /// Text content of the named child tag, trimmed. The common
    /// `<groupId>io.quarkus</groupId>` lookup.
    pub fn child_text(&self, tag: &str) -> Option<String> {
        self.child_element(tag)
            .and_then(|c| c.text_content())
            .map(|t| t.trim().to_string())
    }

    /// Rebuild with a child appended, keeping this element's identity.
    ///
    /// If the last child is a whitespace-only text run (the indentation of
    /// the closing tag), the new child lands before it so serialized output
    /// stays tidy.
    pub fn with_child_appended(self, child: PomNode) -> Result<Self, StructuralViolation> {
        match self {
            PomNode::Element {
                id,
                name,
                attributes,
                mut children,
            } => {
                let at = match children.last() {
                    Some(PomNode::Text { content, .. }) if content.trim().is_empty() => {
                        children.len() - 1
                    }
                    _ => children.len(),
                };
                children.insert(at, child);
                let node = PomNode::Element {
                    id,
                    name,
                    attributes,
                    children,
                };
                node.validate()?;
                Ok(node)
            }
            other => Err(StructuralViolation::new(format!(
                "with_child_appended on non-element {}",
                other.label()
            ))),
        }
    }

    /// Rebuild with all children replaced, keeping identity.
    pub fn with_children(self, new_children: Vec<PomNode>) -> Result<Self, StructuralViolation> {
        match self {
            PomNode::Element {
                id, name, attributes, ..
            } => {
                let node = PomNode::Element {
                    id,
                    name,
                    attributes,
                    children: new_children,
                };
                node.validate()?;
                Ok(node)
            }
            other => Err(StructuralViolation::new(format!(
                "with_children on non-element {}",
                other.label()
            ))),
        }
    }

    /// Rebuild as `<name>value</name>`, keeping identity and attributes.
    pub fn with_text_value(self, value: impl Into<String>) -> Result<Self, StructuralViolation> {
        match self {
            PomNode::Element {
                id, name, attributes, ..
            } => Ok(PomNode::Element {
                id,
                name,
                attributes,
                children: vec![PomNode::text(value)],
            }),
            other => Err(StructuralViolation::new(format!(
                "with_text_value on non-element {}",
                other.label()
            ))),
        }
    }

    /// Drop children matching the predicate, keeping identity. A whitespace
    /// text run immediately before a dropped element goes with it.
    pub fn without_children(self, pred: impl Fn(&PomNode) -> bool) -> Result<Self, StructuralViolation> {
        match self {
            PomNode::Element {
                id,
                name,
                attributes,
                children,
            } => {
                let mut kept: Vec<PomNode> = Vec::with_capacity(children.len());
                for child in children {
                    if pred(&child) {
                        if let Some(PomNode::Text { content, .. }) = kept.last() {
                            if content.trim().is_empty() {
                                kept.pop();
                            }
                        }
                        continue;
                    }
                    kept.push(child);
                }
                Ok(PomNode::Element {
                    id,
                    name,
                    attributes,
                    children: kept,
                })
            }
            other => Err(StructuralViolation::new(format!(
                "without_children on non-element {}",
                other.label()
            ))),
        }
    }
}

fn valid_xml_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '.')
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
}

impl TreeNode for PomNode {
    fn child_nodes(&self) -> Vec<&Self> {
        match self {
            PomNode::Element { children, .. } => children.iter().collect(),
            _ => Vec::new(),
        }
    }

    fn map_children<F>(self, f: &mut F) -> Result<(Self, bool), RewriteError>
    where
        F: FnMut(Self) -> Result<(Self, bool), RewriteError>,
    {
        match self {
            PomNode::Element {
                id,
                name,
                attributes,
                children,
            } => {
                let mut changed = false;
                let mut mapped = Vec::with_capacity(children.len());
                for child in children {
                    let (node, c) = f(child)?;
                    changed |= c;
                    mapped.push(node);
                }
                Ok((
                    PomNode::Element {
                        id,
                        name,
                        attributes,
                        children: mapped,
                    },
                    changed,
                ))
            }
            leaf => Ok((leaf, false)),
        }
    }

    fn structural_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                PomNode::Element {
                    name: n1,
                    attributes: a1,
                    children: c1,
                    ..
                },
                PomNode::Element {
                    name: n2,
                    attributes: a2,
                    children: c2,
                    ..
                },
            ) => {
                n1 == n2
                    && a1 == a2
                    && c1.len() == c2.len()
                    && c1.iter().zip(c2).all(|(x, y)| x.structural_eq(y))
            }
            (PomNode::Text { content: a, .. }, PomNode::Text { content: b, .. }) => a == b,
            (PomNode::Comment { text: a, .. }, PomNode::Comment { text: b, .. }) => a == b,
            _ => false,
        }
    }

    fn validate(&self) -> Result<(), StructuralViolation> {
        match self {
            PomNode::Element {
                name, attributes, ..
            } => {
                if !valid_xml_name(name) {
                    return Err(StructuralViolation::new(format!(
                        "invalid element name '{}'",
                        name
                    )));
                }
                for (attr, _) in attributes {
                    if !valid_xml_name(attr) {
                        return Err(StructuralViolation::new(format!(
                            "invalid attribute name '{}' on <{}>",
                            attr, name
                        )));
                    }
                }
                Ok(())
            }
            PomNode::Comment { text, .. } => {
                if text.contains("--") {
                    return Err(StructuralViolation::new("'--' inside XML comment"));
                }
                Ok(())
            }
            PomNode::Text { .. } => Ok(()),
        }
    }

    fn slot_compatible(&self, replacement: &Self) -> bool {
        match (self, replacement) {
            // An element position must keep holding an element; inline
            // content may swap freely between text and comment.
            (PomNode::Element { .. }, PomNode::Element { .. }) => true,
            (PomNode::Element { .. }, _) => false,
            (_, PomNode::Element { .. }) => false,
            _ => true,
        }
    }

    fn label(&self) -> String {
        match self {
            PomNode::Element { name, .. } => format!("element <{}>", name),
            PomNode::Text { .. } => "text".to_string(),
            PomNode::Comment { .. } => "comment".to_string(),
        }
    }
}
