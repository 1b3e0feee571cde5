//! Language-source AST (Java-like), as a closed variant set.
//!
//! This is deliberately not a full Java grammar: the engine only needs
//! enough shape to locate rewrite targets (imports, annotations, type
//! names, call chains). The external parser builds these nodes through the
//! validating constructors and records resolved types in a
//! [`crate::semantics::TypeTable`] keyed by node id.
//!
//! Variants fall into slot families - import, type declaration, member,
//! annotation, parameter, expression - and a rewrite may reshape a node
//! freely within its family but never across families.

use crate::error::{RewriteError, StructuralViolation};
use crate::tree::{next_node_id, NodeId, TreeNode};

/// Node variants of a source document.
#[derive(Debug, Clone)]
pub enum JavaNode {
    CompilationUnit {
        id: NodeId,
        package: Option<String>,
        imports: Vec<JavaNode>,
        types: Vec<JavaNode>,
    },
    Import {
        id: NodeId,
        path: String,
        is_static: bool,
    },
    Class {
        id: NodeId,
        name: String,
        annotations: Vec<JavaNode>,
        members: Vec<JavaNode>,
    },
    Field {
        id: NodeId,
        name: String,
        type_name: String,
        annotations: Vec<JavaNode>,
    },
    Method {
        id: NodeId,
        name: String,
        annotations: Vec<JavaNode>,
        params: Vec<JavaNode>,
        body: Vec<JavaNode>,
    },
    Param {
        id: NodeId,
        name: String,
        type_name: String,
    },
    Annotation {
        id: NodeId,
        name: String,
        args: Vec<JavaNode>,
    },
    Block {
        id: NodeId,
        statements: Vec<JavaNode>,
    },
    MethodInvocation {
        id: NodeId,
        select: Option<Box<JavaNode>>,
        name: String,
        args: Vec<JavaNode>,
    },
    Lambda {
        id: NodeId,
        params: Vec<String>,
        body: Box<JavaNode>,
    },
    Identifier {
        id: NodeId,
        name: String,
    },
    Literal {
        id: NodeId,
        value: String,
    },
}

/// Slot families; a rewrite must stay within the family of the node it
/// replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotFamily {
    Unit,
    Import,
    TypeDecl,
    Member,
    Param,
    Annotation,
    Expression,
}

fn family(node: &JavaNode) -> SlotFamily {
    match node {
        JavaNode::CompilationUnit { .. } => SlotFamily::Unit,
        JavaNode::Import { .. } => SlotFamily::Import,
        JavaNode::Class { .. } => SlotFamily::TypeDecl,
        JavaNode::Field { .. } | JavaNode::Method { .. } => SlotFamily::Member,
        JavaNode::Param { .. } => SlotFamily::Param,
        JavaNode::Annotation { .. } => SlotFamily::Annotation,
        JavaNode::Block { .. }
        | JavaNode::MethodInvocation { .. }
        | JavaNode::Lambda { .. }
        | JavaNode::Identifier { .. }
        | JavaNode::Literal { .. } => SlotFamily::Expression,
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn is_dotted_name(s: &str) -> bool {
    !s.is_empty() && s.split('.').all(is_identifier)
}

/// Type references may be dotted, generic, or arrays: `Uni<Void>`,
/// `java.util.List<String>`, `byte[]`.
fn is_type_name(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '$' | '.' | '<' | '>' | '[' | ']' | ',' | ' ' | '?'))
}

fn expect_family(children: &[JavaNode], allowed: &[SlotFamily], slot: &str) -> Result<(), StructuralViolation> {
    for child in children {
        if !allowed.contains(&family(child)) {
            return Err(StructuralViolation::new(format!(
                "{} slot cannot hold {}",
                slot,
                child.label()
            )));
        }
    }
    Ok(())
}

impl JavaNode {
    pub fn compilation_unit(
        package: Option<&str>,
        imports: Vec<JavaNode>,
        types: Vec<JavaNode>,
    ) -> Result<Self, StructuralViolation> {
        let node = JavaNode::CompilationUnit {
            id: next_node_id(),
            package: package.map(str::to_string),
            imports,
            types,
        };
        node.validate()?;
        Ok(node)
    }

    pub fn import(path: impl Into<String>) -> Result<Self, StructuralViolation> {
        let node = JavaNode::Import {
            id: next_node_id(),
            path: path.into(),
            is_static: false,
        };
        node.validate()?;
        Ok(node)
    }

    pub fn class(
        name: impl Into<String>,
        annotations: Vec<JavaNode>,
        members: Vec<JavaNode>,
    ) -> Result<Self, StructuralViolation> {
        let node = JavaNode::Class {
            id: next_node_id(),
            name: name.into(),
            annotations,
            members,
        };
        node.validate()?;
        Ok(node)
    }

    pub fn field(
        name: impl Into<String>,
        type_name: impl Into<String>,
        annotations: Vec<JavaNode>,
    ) -> Result<Self, StructuralViolation> {
        let node = JavaNode::Field {
            id: next_node_id(),
            name: name.into(),
            type_name: type_name.into(),
            annotations,
        };
        node.validate()?;
        Ok(node)
    }

    pub fn method(
        name: impl Into<String>,
        annotations: Vec<JavaNode>,
        params: Vec<JavaNode>,
        body: Vec<JavaNode>,
    ) -> Result<Self, StructuralViolation> {
        let node = JavaNode::Method {
            id: next_node_id(),
            name: name.into(),
            annotations,
            params,
            body,
        };
        node.validate()?;
        Ok(node)
    }

    pub fn param(name: impl Into<String>, type_name: impl Into<String>) -> Result<Self, StructuralViolation> {
        let node = JavaNode::Param {
            id: next_node_id(),
            name: name.into(),
            type_name: type_name.into(),
        };
        node.validate()?;
        Ok(node)
    }

    pub fn annotation(name: impl Into<String>, args: Vec<JavaNode>) -> Result<Self, StructuralViolation> {
        let node = JavaNode::Annotation {
            id: next_node_id(),
            name: name.into(),
            args,
        };
        node.validate()?;
        Ok(node)
    }

    pub fn block(statements: Vec<JavaNode>) -> Result<Self, StructuralViolation> {
        let node = JavaNode::Block {
            id: next_node_id(),
            statements,
        };
        node.validate()?;
        Ok(node)
    }

    pub fn invocation(
        select: Option<JavaNode>,
        name: impl Into<String>,
        args: Vec<JavaNode>,
    ) -> Result<Self, StructuralViolation> {
        let node = JavaNode::MethodInvocation {
            id: next_node_id(),
            select: select.map(Box::new),
            name: name.into(),
            args,
        };
        node.validate()?;
        Ok(node)
    }

    pub fn lambda(params: Vec<String>, body: JavaNode) -> Result<Self, StructuralViolation> {
        let node = JavaNode::Lambda {
            id: next_node_id(),
            params,
            body: Box::new(body),
        };
        node.validate()?;
        Ok(node)
    }

    pub fn ident(name: impl Into<String>) -> Result<Self, StructuralViolation> {
        let node = JavaNode::Identifier {
            id: next_node_id(),
            name: name.into(),
        };
        node.validate()?;
        Ok(node)
    }

    pub fn literal(value: impl Into<String>) -> Self {
        JavaNode::Literal {
            id: next_node_id(),
            value: value.into(),
        }
    }

    pub fn id(&self) -> NodeId {
        match self {
            JavaNode::CompilationUnit { id, .. }
            | JavaNode::Import { id, .. }
            | JavaNode::Class { id, .. }
            | JavaNode::Field { id, .. }
            | JavaNode::Method { id, .. }
            | JavaNode::Param { id, .. }
            | JavaNode::Annotation { id, .. }
            | JavaNode::Block { id, .. }
            | JavaNode::MethodInvocation { id, .. }
            | JavaNode::Lambda { id, .. }
            | JavaNode::Identifier { id, .. }
            | JavaNode::Literal { id, .. } => *id,
        }
    }

    /// Declared or invoked name, for the variants that carry one.
    pub fn simple_name(&self) -> Option<&str> {
        match self {
            JavaNode::Class { name, .. }
            | JavaNode::Field { name, .. }
            | JavaNode::Method { name, .. }
            | JavaNode::Param { name, .. }
            | JavaNode::Annotation { name, .. }
            | JavaNode::MethodInvocation { name, .. }
            | JavaNode::Identifier { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn import_path(&self) -> Option<&str> {
        match self {
            JavaNode::Import { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn invocation_select(&self) -> Option<&JavaNode> {
        match self {
            JavaNode::MethodInvocation { select, .. } => select.as_deref(),
            _ => None,
        }
    }

    /// Rename an invocation, keeping identity, receiver, and arguments.
    pub fn with_method_name(self, new_name: impl Into<String>) -> Result<Self, StructuralViolation> {
        match self {
            JavaNode::MethodInvocation {
                id, select, args, ..
            } => {
                let node = JavaNode::MethodInvocation {
                    id,
                    select,
                    name: new_name.into(),
                    args,
                };
                node.validate()?;
                Ok(node)
            }
            other => Err(StructuralViolation::new(format!(
                "with_method_name on {}",
                other.label()
            ))),
        }
    }

    /// Replace an invocation's receiver chain, keeping identity.
    pub fn with_select(self, new_select: Option<JavaNode>) -> Result<Self, StructuralViolation> {
        match self {
            JavaNode::MethodInvocation { id, name, args, .. } => {
                let node = JavaNode::MethodInvocation {
                    id,
                    select: new_select.map(Box::new),
                    name,
                    args,
                };
                node.validate()?;
                Ok(node)
            }
            other => Err(StructuralViolation::new(format!(
                "with_select on {}",
                other.label()
            ))),
        }
    }

    /// Repoint an import, keeping identity.
    pub fn with_import_path(self, new_path: impl Into<String>) -> Result<Self, StructuralViolation> {
        match self {
            JavaNode::Import { id, is_static, .. } => {
                let node = JavaNode::Import {
                    id,
                    path: new_path.into(),
                    is_static,
                };
                node.validate()?;
                Ok(node)
            }
            other => Err(StructuralViolation::new(format!(
                "with_import_path on {}",
                other.label()
            ))),
        }
    }

    /// Rename an annotation, keeping identity and arguments.
    pub fn with_annotation_name(self, new_name: impl Into<String>) -> Result<Self, StructuralViolation> {
        match self {
            JavaNode::Annotation { id, args, .. } => {
                let node = JavaNode::Annotation {
                    id,
                    name: new_name.into(),
                    args,
                };
                node.validate()?;
                Ok(node)
            }
            other => Err(StructuralViolation::new(format!(
                "with_annotation_name on {}",
                other.label()
            ))),
        }
    }

    /// Retype a field or parameter, keeping identity.
    pub fn with_type_name(self, new_type: impl Into<String>) -> Result<Self, StructuralViolation> {
        match self {
            JavaNode::Field {
                id,
                name,
                annotations,
                ..
            } => {
                let node = JavaNode::Field {
                    id,
                    name,
                    type_name: new_type.into(),
                    annotations,
                };
                node.validate()?;
                Ok(node)
            }
            JavaNode::Param { id, name, .. } => {
                let node = JavaNode::Param {
                    id,
                    name,
                    type_name: new_type.into(),
                };
                node.validate()?;
                Ok(node)
            }
            other => Err(StructuralViolation::new(format!(
                "with_type_name on {}",
                other.label()
            ))),
        }
    }
}

impl TreeNode for JavaNode {
    fn child_nodes(&self) -> Vec<&Self> {
        match self {
            JavaNode::CompilationUnit { imports, types, .. } => {
                imports.iter().chain(types.iter()).collect()
            }
            JavaNode::Class {
                annotations,
                members,
                ..
            } => annotations.iter().chain(members.iter()).collect(),
            JavaNode::Field { annotations, .. } => annotations.iter().collect(),
            JavaNode::Method {
                annotations,
                params,
                body,
                ..
            } => annotations.iter().chain(params.iter()).chain(body.iter()).collect(),
            JavaNode::Annotation { args, .. } => args.iter().collect(),
            JavaNode::Block { statements, .. } => statements.iter().collect(),
            JavaNode::MethodInvocation { select, args, .. } => {
                select.as_deref().into_iter().chain(args.iter()).collect()
            }
            JavaNode::Lambda { body, .. } => vec![body.as_ref()],
            JavaNode::Import { .. }
            | JavaNode::Param { .. }
            | JavaNode::Identifier { .. }
            | JavaNode::Literal { .. } => Vec::new(),
        }
    }

    fn map_children<F>(self, f: &mut F) -> Result<(Self, bool), RewriteError>
    where
        F: FnMut(Self) -> Result<(Self, bool), RewriteError>,
    {
        fn map_vec<F>(nodes: Vec<JavaNode>, changed: &mut bool, f: &mut F) -> Result<Vec<JavaNode>, RewriteError>
        where
            F: FnMut(JavaNode) -> Result<(JavaNode, bool), RewriteError>,
        {
            let mut out = Vec::with_capacity(nodes.len());
            for node in nodes {
                let (mapped, c) = f(node)?;
                *changed |= c;
                out.push(mapped);
            }
            Ok(out)
        }

        let mut changed = false;
        let node = match self {
            JavaNode::CompilationUnit {
                id,
                package,
                imports,
                types,
            } => JavaNode::CompilationUnit {
                id,
                package,
                imports: map_vec(imports, &mut changed, f)?,
                types: map_vec(types, &mut changed, f)?,
            },
            JavaNode::Class {
                id,
                name,
                annotations,
                members,
            } => JavaNode::Class {
                id,
                name,
                annotations: map_vec(annotations, &mut changed, f)?,
                members: map_vec(members, &mut changed, f)?,
            },
            JavaNode::Field {
                id,
                name,
                type_name,
                annotations,
            } => JavaNode::Field {
                id,
                name,
                type_name,
                annotations: map_vec(annotations, &mut changed, f)?,
            },
            JavaNode::Method {
                id,
                name,
                annotations,
                params,
                body,
            } => JavaNode::Method {
                id,
                name,
                annotations: map_vec(annotations, &mut changed, f)?,
                params: map_vec(params, &mut changed, f)?,
                body: map_vec(body, &mut changed, f)?,
            },
            JavaNode::Annotation { id, name, args } => JavaNode::Annotation {
                id,
                name,
                args: map_vec(args, &mut changed, f)?,
            },
            JavaNode::Block { id, statements } => JavaNode::Block {
                id,
                statements: map_vec(statements, &mut changed, f)?,
            },
            JavaNode::MethodInvocation {
                id,
                select,
                name,
                args,
            } => {
                let select = match select {
                    Some(s) => {
                        let (mapped, c) = f(*s)?;
                        changed |= c;
                        Some(Box::new(mapped))
                    }
                    None => None,
                };
                JavaNode::MethodInvocation {
                    id,
                    select,
                    name,
                    args: map_vec(args, &mut changed, f)?,
                }
            }
            JavaNode::Lambda { id, params, body } => {
                let (mapped, c) = f(*body)?;
                changed |= c;
                JavaNode::Lambda {
                    id,
                    params,
                    body: Box::new(mapped),
                }
            }
            leaf => leaf,
        };
        Ok((node, changed))
    }

    fn structural_eq(&self, other: &Self) -> bool {
        fn vec_eq(a: &[JavaNode], b: &[JavaNode]) -> bool {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.structural_eq(y))
        }
        match (self, other) {
            (
                JavaNode::CompilationUnit {
                    package: p1,
                    imports: i1,
                    types: t1,
                    ..
                },
                JavaNode::CompilationUnit {
                    package: p2,
                    imports: i2,
                    types: t2,
                    ..
                },
            ) => p1 == p2 && vec_eq(i1, i2) && vec_eq(t1, t2),
            (
                JavaNode::Import {
                    path: p1,
                    is_static: s1,
                    ..
                },
                JavaNode::Import {
                    path: p2,
                    is_static: s2,
                    ..
                },
            ) => p1 == p2 && s1 == s2,
            (
                JavaNode::Class {
                    name: n1,
                    annotations: a1,
                    members: m1,
                    ..
                },
                JavaNode::Class {
                    name: n2,
                    annotations: a2,
                    members: m2,
                    ..
                },
            ) => n1 == n2 && vec_eq(a1, a2) && vec_eq(m1, m2),
            (
                JavaNode::Field {
                    name: n1,
                    type_name: t1,
                    annotations: a1,
                    ..
                },
                JavaNode::Field {
                    name: n2,
                    type_name: t2,
                    annotations: a2,
                    ..
                },
            ) => n1 == n2 && t1 == t2 && vec_eq(a1, a2),
            (
                JavaNode::Method {
                    name: n1,
                    annotations: a1,
                    params: p1,
                    body: b1,
                    ..
                },
                JavaNode::Method {
                    name: n2,
                    annotations: a2,
                    params: p2,
                    body: b2,
                    ..
                },
            ) => n1 == n2 && vec_eq(a1, a2) && vec_eq(p1, p2) && vec_eq(b1, b2),
            (
                JavaNode::Param {
                    name: n1,
                    type_name: t1,
                    ..
                },
                JavaNode::Param {
                    name: n2,
                    type_name: t2,
                    ..
                },
            ) => n1 == n2 && t1 == t2,
            (
                JavaNode::Annotation {
                    name: n1, args: a1, ..
                },
                JavaNode::Annotation {
                    name: n2, args: a2, ..
                },
            ) => n1 == n2 && vec_eq(a1, a2),
            (JavaNode::Block { statements: s1, .. }, JavaNode::Block { statements: s2, .. }) => {
                vec_eq(s1, s2)
            }
            (
                JavaNode::MethodInvocation {
                    select: sel1,
                    name: n1,
                    args: a1,
                    ..
                },
                JavaNode::MethodInvocation {
                    select: sel2,
                    name: n2,
                    args: a2,
                    ..
                },
            ) => {
                n1 == n2
                    && vec_eq(a1, a2)
                    && match (sel1, sel2) {
                        (Some(x), Some(y)) => x.structural_eq(y),
                        (None, None) => true,
                        _ => false,
                    }
            }
            (
                JavaNode::Lambda {
                    params: p1,
                    body: b1,
                    ..
                },
                JavaNode::Lambda {
                    params: p2,
                    body: b2,
                    ..
                },
            ) => p1 == p2 && b1.structural_eq(b2),
            (JavaNode::Identifier { name: a, .. }, JavaNode::Identifier { name: b, .. }) => a == b,
            (JavaNode::Literal { value: a, .. }, JavaNode::Literal { value: b, .. }) => a == b,
            _ => false,
        }
    }

    fn validate(&self) -> Result<(), StructuralViolation> {
        match self {
            JavaNode::CompilationUnit {
                package,
                imports,
                types,
                ..
            } => {
                if let Some(p) = package {
                    if !is_dotted_name(p) {
                        return Err(StructuralViolation::new(format!("invalid package '{}'", p)));
                    }
                }
                expect_family(imports, &[SlotFamily::Import], "import")?;
                expect_family(types, &[SlotFamily::TypeDecl], "type declaration")
            }
            JavaNode::Import { path, .. } => {
                if !is_dotted_name(path.strip_suffix(".*").unwrap_or(path)) {
                    return Err(StructuralViolation::new(format!("invalid import '{}'", path)));
                }
                Ok(())
            }
            JavaNode::Class {
                name,
                annotations,
                members,
                ..
            } => {
                if !is_identifier(name) {
                    return Err(StructuralViolation::new(format!("invalid class name '{}'", name)));
                }
                expect_family(annotations, &[SlotFamily::Annotation], "annotation")?;
                expect_family(members, &[SlotFamily::Member], "member")
            }
            JavaNode::Field {
                name,
                type_name,
                annotations,
                ..
            } => {
                if !is_identifier(name) {
                    return Err(StructuralViolation::new(format!("invalid field name '{}'", name)));
                }
                if !is_type_name(type_name) {
                    return Err(StructuralViolation::new(format!("invalid field type '{}'", type_name)));
                }
                expect_family(annotations, &[SlotFamily::Annotation], "annotation")
            }
            JavaNode::Method {
                name,
                annotations,
                params,
                body,
                ..
            } => {
                if !is_identifier(name) {
                    return Err(StructuralViolation::new(format!("invalid method name '{}'", name)));
                }
                expect_family(annotations, &[SlotFamily::Annotation], "annotation")?;
                expect_family(params, &[SlotFamily::Param], "parameter")?;
                expect_family(body, &[SlotFamily::Expression], "statement")
            }
            JavaNode::Param { name, type_name, .. } => {
                if !is_identifier(name) {
                    return Err(StructuralViolation::new(format!("invalid parameter name '{}'", name)));
                }
                if !is_type_name(type_name) {
                    return Err(StructuralViolation::new(format!(
                        "invalid parameter type '{}'",
                        type_name
                    )));
                }
                Ok(())
            }
            JavaNode::Annotation { name, args, .. } => {
                if !is_dotted_name(name) {
                    return Err(StructuralViolation::new(format!(
                        "invalid annotation name '{}'",
                        name
                    )));
                }
                expect_family(args, &[SlotFamily::Expression], "annotation argument")
            }
            JavaNode::Block { statements, .. } => {
                expect_family(statements, &[SlotFamily::Expression], "statement")
            }
            JavaNode::MethodInvocation {
                select, name, args, ..
            } => {
                if !is_identifier(name) {
                    return Err(StructuralViolation::new(format!("invalid method name '{}'", name)));
                }
                if let Some(s) = select {
                    expect_family(std::slice::from_ref(s.as_ref()), &[SlotFamily::Expression], "receiver")?;
                }
                expect_family(args, &[SlotFamily::Expression], "argument")
            }
            JavaNode::Lambda { body, .. } => {
                expect_family(std::slice::from_ref(body.as_ref()), &[SlotFamily::Expression], "lambda body")
            }
            JavaNode::Identifier { name, .. } => {
                if !is_identifier(name) {
                    return Err(StructuralViolation::new(format!("invalid identifier '{}'", name)));
                }
                Ok(())
            }
            JavaNode::Literal { .. } => Ok(()),
        }
    }

    fn slot_compatible(&self, replacement: &Self) -> bool {
        family(self) == family(replacement)
    }

    fn label(&self) -> String {
        match self {
            JavaNode::CompilationUnit { package, .. } => match package {
                Some(p) => format!("compilation unit ({})", p),
                None => "compilation unit".to_string(),
            },
            JavaNode::Import { path, .. } => format!("import {}", path),
            JavaNode::Class { name, .. } => format!("class {}", name),
            JavaNode::Field { name, .. } => format!("field {}", name),
            JavaNode::Method { name, .. } => format!("method {}()", name),
            JavaNode::Param { name, .. } => format!("param {}", name),
            JavaNode::Annotation { name, .. } => format!("annotation @{}", name),
            JavaNode::Block { .. } => "block".to_string(),
            JavaNode::MethodInvocation { name, .. } => format!("call {}(..)", name),
            JavaNode::Lambda { .. } => "lambda".to_string(),
            JavaNode::Identifier { name, .. } => format!("identifier {}", name),
            JavaNode::Literal { value, .. } => format!("literal {}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_nodes_rejected_at_construction() {
        assert!(JavaNode::import("not a path!").is_err());
        assert!(JavaNode::class("2Bad", vec![], vec![]).is_err());
        assert!(JavaNode::ident("").is_err());
        // Wrong slot: a literal is not an import.
        assert!(JavaNode::compilation_unit(None, vec![JavaNode::literal("1")], vec![]).is_err());
    }

    #[test]
    fn test_wildcard_import_allowed() {
        assert!(JavaNode::import("io.quarkus.runtime.*").is_ok());
    }

    #[test]
    fn test_with_method_name_keeps_identity() {
        let recv = JavaNode::ident("multi").unwrap();
        let call = JavaNode::invocation(Some(recv), "apply", vec![]).unwrap();
        let id = call.id();
        let renamed = call.with_method_name("transform").unwrap();
        assert_eq!(renamed.id(), id);
        assert_eq!(renamed.simple_name(), Some("transform"));
        assert!(renamed.invocation_select().is_some());
    }

    #[test]
    fn test_structural_eq_ignores_ids() {
        let a = JavaNode::invocation(None, "run", vec![JavaNode::literal("1")]).unwrap();
        let b = JavaNode::invocation(None, "run", vec![JavaNode::literal("1")]).unwrap();
        assert!(a.structural_eq(&b));
        let c = JavaNode::invocation(None, "run", vec![]).unwrap();
        assert!(!a.structural_eq(&c));
    }

    #[test]
    fn test_child_order_is_source_order() {
        let unit = JavaNode::compilation_unit(
            Some("demo"),
            vec![
                JavaNode::import("a.A").unwrap(),
                JavaNode::import("b.B").unwrap(),
            ],
            vec![JavaNode::class("C", vec![], vec![]).unwrap()],
        )
        .unwrap();
        let labels: Vec<String> = unit.child_nodes().iter().map(|n| n.label()).collect();
        assert_eq!(labels, vec!["import a.A", "import b.B", "class C"]);
    }

    #[test]
    fn test_slot_families() {
        let import = JavaNode::import("a.A").unwrap();
        let other_import = JavaNode::import("b.B").unwrap();
        let ident = JavaNode::ident("x").unwrap();
        assert!(import.slot_compatible(&other_import));
        assert!(!import.slot_compatible(&ident));
        let field = JavaNode::field("f", "String", vec![]).unwrap();
        let method = JavaNode::method("m", vec![], vec![], vec![]).unwrap();
        assert!(field.slot_compatible(&method));
    }
}
