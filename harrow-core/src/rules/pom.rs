//! Build-descriptor rule primitives.
//!
//! Plugin rules anchor at the `<plugin>` element carrying the configured
//! coordinates and rebuild the whole missing scaffolding
//! (`executions/execution/goals`) in one transform, so a single pass
//! converges. Removal rules anchor at the parent list element, since
//! dropping a child is a rebuild of the parent.

use crate::context::ExecutionContext;
use crate::error::StructuralViolation;
use crate::rule::TreeRule;
use crate::tree::{PomNode, TreeNode};

/// Whether a node is a `<plugin>` element with the given coordinates.
pub fn is_plugin(node: &PomNode, group_id: &str, artifact_id: &str) -> bool {
    node.is_element_named("plugin")
        && node.child_text("groupId").as_deref() == Some(group_id)
        && node.child_text("artifactId").as_deref() == Some(artifact_id)
}

/// Update the first child element named `tag`, creating an empty one if
/// missing. Keeps the parent's identity; the child keeps its own when it
/// already existed.
fn ensure_child(
    parent: PomNode,
    tag: &str,
    f: impl FnOnce(PomNode) -> Result<PomNode, StructuralViolation>,
) -> Result<PomNode, StructuralViolation> {
    match parent {
        PomNode::Element {
            id,
            name,
            attributes,
            mut children,
        } => {
            match children.iter().position(|c| c.is_element_named(tag)) {
                Some(i) => {
                    let child = children.remove(i);
                    children.insert(i, f(child)?);
                    let node = PomNode::Element {
                        id,
                        name,
                        attributes,
                        children,
                    };
                    node.validate()?;
                    Ok(node)
                }
                None => {
                    let fresh = f(PomNode::element(tag, Vec::new())?)?;
                    PomNode::Element {
                        id,
                        name,
                        attributes,
                        children,
                    }
                    .with_child_appended(fresh)
                }
            }
        }
        other => Err(StructuralViolation::new(format!(
            "cannot ensure <{}> under {}",
            tag,
            other.label()
        ))),
    }
}

fn plugin_has_goal(plugin: &PomNode, goal: &str) -> bool {
    let Some(executions) = plugin.child_element("executions") else {
        return false;
    };
    executions
        .child_elements()
        .iter()
        .filter(|e| e.is_element_named("execution"))
        .any(|execution| {
            execution.child_element("goals").is_some_and(|goals| {
                goals.child_elements().iter().any(|g| {
                    g.is_element_named("goal")
                        && g.text_content().is_some_and(|t| t.trim() == goal)
                })
            })
        })
}

/// Ensure a plugin's first execution declares the given goal, creating the
/// `executions/execution/goals` chain as needed.
pub struct AddPluginGoal {
    pub group_id: String,
    pub artifact_id: String,
    pub goal: String,
}

impl TreeRule<PomNode> for AddPluginGoal {
    fn matches(&self, node: &PomNode) -> bool {
        is_plugin(node, &self.group_id, &self.artifact_id)
    }

    fn transform(
        &self,
        node: PomNode,
        _ctx: &mut ExecutionContext,
    ) -> Result<PomNode, StructuralViolation> {
        if plugin_has_goal(&node, &self.goal) {
            return Ok(node);
        }
        ensure_child(node, "executions", |executions| {
            ensure_child(executions, "execution", |execution| {
                ensure_child(execution, "goals", |goals| {
                    goals.with_child_appended(PomNode::tag("goal", &self.goal)?)
                })
            })
        })
    }
}

/// Force a plugin's `<extensions>` flag to a fixed value, adding the tag if
/// the plugin has none.
pub struct SetPluginExtensions {
    pub group_id: String,
    pub artifact_id: String,
    pub value: bool,
}

impl TreeRule<PomNode> for SetPluginExtensions {
    fn matches(&self, node: &PomNode) -> bool {
        is_plugin(node, &self.group_id, &self.artifact_id)
    }

    fn transform(
        &self,
        node: PomNode,
        _ctx: &mut ExecutionContext,
    ) -> Result<PomNode, StructuralViolation> {
        let wanted = if self.value { "true" } else { "false" };
        ensure_child(node, "extensions", |extensions| {
            if extensions.text_content().map(|t| t.trim().to_string()).as_deref() == Some(wanted) {
                Ok(extensions)
            } else {
                extensions.with_text_value(wanted)
            }
        })
    }
}

/// Drop a plugin declaration entirely.
pub struct RemovePlugin {
    pub group_id: String,
    pub artifact_id: String,
}

impl TreeRule<PomNode> for RemovePlugin {
    fn matches(&self, node: &PomNode) -> bool {
        node.is_element_named("plugins")
            && node
                .child_elements()
                .iter()
                .any(|c| is_plugin(c, &self.group_id, &self.artifact_id))
    }

    fn transform(
        &self,
        node: PomNode,
        _ctx: &mut ExecutionContext,
    ) -> Result<PomNode, StructuralViolation> {
        node.without_children(|c| is_plugin(c, &self.group_id, &self.artifact_id))
    }
}

/// Set the text value of every tag at a fixed path from the document root,
/// e.g. `["project", "properties", "quarkus.platform.version"]`. Does not
/// create missing tags.
pub struct ChangeTagValue {
    pub path: Vec<String>,
    pub old_value: Option<String>,
    pub new_value: String,
}

impl ChangeTagValue {
    /// Parse a `/`-separated path; must have at least a root and one tag.
    pub fn from_path(
        path: &str,
        old_value: Option<String>,
        new_value: impl Into<String>,
    ) -> Result<Self, StructuralViolation> {
        let segments: Vec<String> = path.split('/').map(str::to_string).collect();
        if segments.len() < 2 || segments.iter().any(String::is_empty) {
            return Err(StructuralViolation::new(format!(
                "invalid tag path '{}'",
                path
            )));
        }
        Ok(Self {
            path: segments,
            old_value,
            new_value: new_value.into(),
        })
    }

    fn rewrite(&self, node: PomNode, rest: &[String]) -> Result<PomNode, StructuralViolation> {
        if rest.is_empty() {
            let current = node.text_content().map(|t| t.trim().to_string());
            let applies = match &self.old_value {
                Some(old) => current.as_deref() == Some(old.as_str()),
                None => true,
            };
            if applies && current.as_deref() != Some(self.new_value.as_str()) {
                return node.with_text_value(&self.new_value);
            }
            return Ok(node);
        }
        match node {
            PomNode::Element {
                id,
                name,
                attributes,
                children,
            } => {
                let mut out = Vec::with_capacity(children.len());
                for child in children {
                    if child.is_element_named(&rest[0]) {
                        out.push(self.rewrite(child, &rest[1..])?);
                    } else {
                        out.push(child);
                    }
                }
                Ok(PomNode::Element {
                    id,
                    name,
                    attributes,
                    children: out,
                })
            }
            other => Ok(other),
        }
    }
}

impl TreeRule<PomNode> for ChangeTagValue {
    fn matches(&self, node: &PomNode) -> bool {
        node.is_element_named(&self.path[0])
    }

    fn transform(
        &self,
        node: PomNode,
        _ctx: &mut ExecutionContext,
    ) -> Result<PomNode, StructuralViolation> {
        self.rewrite(node, &self.path[1..])
    }
}
