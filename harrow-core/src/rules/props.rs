//! Configuration-list rule primitives.
//!
//! Key matching is by regex over the bare (profile-stripped) key, with
//! capture-group substitution available in replacements. Profile scoping
//! follows the configuration convention: a named profile targets only
//! `%profile.`-prefixed entries, the default scope targets only unprefixed
//! ones, and the all scope targets everything.

use regex::Regex;

use crate::context::ExecutionContext;
use crate::error::StructuralViolation;
use crate::rule::TreeRule;
use crate::tree::props::{join_profile, split_profile};
use crate::tree::{PropsNode, TreeNode};

/// Which profiles a property rule touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileScope {
    /// Every profile, including the default.
    All,
    /// Only unprefixed entries.
    Default,
    /// Only `%name.`-prefixed entries.
    Named(String),
}

impl ProfileScope {
    /// Resolve the option pair the declarative format exposes: a named
    /// profile wins; otherwise "change all profiles" defaults to true.
    pub fn from_options(profile: Option<String>, change_all_profiles: Option<bool>) -> Self {
        match profile {
            Some(p) => ProfileScope::Named(p),
            None if change_all_profiles == Some(false) => ProfileScope::Default,
            None => ProfileScope::All,
        }
    }

    fn admits(&self, profile: Option<&str>) -> bool {
        match self {
            ProfileScope::All => true,
            ProfileScope::Default => profile.is_none(),
            ProfileScope::Named(name) => profile == Some(name.as_str()),
        }
    }
}

/// Anchor a user pattern so it must match the whole key.
fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", pattern))
}

/// Rename property keys matching a pattern.
pub struct ChangePropertyKey {
    pattern: Regex,
    replacement: String,
    scope: ProfileScope,
}

impl ChangePropertyKey {
    pub fn new(old_key: &str, new_key: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: anchored(old_key)?,
            replacement: new_key.into(),
            scope: ProfileScope::All,
        })
    }

    pub fn with_scope(mut self, scope: ProfileScope) -> Self {
        self.scope = scope;
        self
    }
}

impl TreeRule<PropsNode> for ChangePropertyKey {
    fn matches(&self, node: &PropsNode) -> bool {
        node.key().is_some_and(|k| {
            let (profile, bare) = split_profile(k);
            self.scope.admits(profile) && self.pattern.is_match(bare)
        })
    }

    fn transform(
        &self,
        node: PropsNode,
        _ctx: &mut ExecutionContext,
    ) -> Result<PropsNode, StructuralViolation> {
        let Some(key) = node.key() else {
            return Ok(node);
        };
        let (profile, bare) = split_profile(key);
        let renamed = self.pattern.replace(bare, self.replacement.as_str()).into_owned();
        let new_key = join_profile(profile, &renamed);
        node.with_key(new_key)
    }
}

/// Set the value of properties whose key matches a pattern, optionally only
/// when the current value is a specific one.
pub struct ChangePropertyValue {
    pattern: Regex,
    old_value: Option<String>,
    new_value: String,
    scope: ProfileScope,
}

impl ChangePropertyValue {
    pub fn new(
        key: &str,
        old_value: Option<String>,
        new_value: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: anchored(key)?,
            old_value,
            new_value: new_value.into(),
            scope: ProfileScope::All,
        })
    }

    pub fn with_scope(mut self, scope: ProfileScope) -> Self {
        self.scope = scope;
        self
    }
}

impl TreeRule<PropsNode> for ChangePropertyValue {
    fn matches(&self, node: &PropsNode) -> bool {
        let Some(key) = node.key() else { return false };
        let (profile, bare) = split_profile(key);
        if !self.scope.admits(profile) || !self.pattern.is_match(bare) {
            return false;
        }
        match &self.old_value {
            Some(expected) => node.value() == Some(expected.as_str()),
            None => true,
        }
    }

    fn transform(
        &self,
        node: PropsNode,
        _ctx: &mut ExecutionContext,
    ) -> Result<PropsNode, StructuralViolation> {
        node.with_value(self.new_value.clone())
    }
}

/// Append a property unless the exact key is already defined.
///
/// Anchored at the file root so the presence check sees the whole list.
pub struct AddProperty {
    pub key: String,
    pub value: String,
}

impl TreeRule<PropsNode> for AddProperty {
    fn matches(&self, node: &PropsNode) -> bool {
        matches!(node, PropsNode::File { .. })
    }

    fn transform(
        &self,
        node: PropsNode,
        _ctx: &mut ExecutionContext,
    ) -> Result<PropsNode, StructuralViolation> {
        let exists = node
            .child_nodes()
            .iter()
            .any(|entry| entry.key() == Some(self.key.as_str()));
        if exists {
            return Ok(node);
        }
        node.with_appended(PropsNode::entry(&self.key, &self.value)?)
    }
}

/// Remove properties whose key matches a pattern.
///
/// Anchored at the file root: removal is a rebuild of the entry list.
pub struct DeleteProperty {
    pattern: Regex,
    scope: ProfileScope,
}

impl DeleteProperty {
    pub fn new(key: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: anchored(key)?,
            scope: ProfileScope::All,
        })
    }

    pub fn with_scope(mut self, scope: ProfileScope) -> Self {
        self.scope = scope;
        self
    }
}

impl TreeRule<PropsNode> for DeleteProperty {
    fn matches(&self, node: &PropsNode) -> bool {
        matches!(node, PropsNode::File { .. })
    }

    fn transform(
        &self,
        node: PropsNode,
        _ctx: &mut ExecutionContext,
    ) -> Result<PropsNode, StructuralViolation> {
        node.without_entries(|entry| {
            entry.key().is_some_and(|k| {
                let (profile, bare) = split_profile(k);
                self.scope.admits(profile) && self.pattern.is_match(bare)
            })
        })
    }
}
