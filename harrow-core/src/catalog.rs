//! Rule catalog: name → definition registry with composite activation.
//!
//! The catalog is populated explicitly at process start - from the built-in
//! manifest and any user-supplied one - and is read-only afterwards. There
//! is no implicit discovery. Activation resolves a set of rule names into a
//! flat, ordered, duplicate-free list of executable rules.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ActivationError;
use crate::rule::Rule;

/// A registered definition: an executable rule, or a composite that merely
/// enumerates other definitions by name.
pub enum RuleDef {
    Single(Arc<dyn Rule>),
    Composite {
        description: String,
        includes: Vec<String>,
    },
}

impl RuleDef {
    pub fn description(&self) -> &str {
        match self {
            RuleDef::Single(rule) => rule.description(),
            RuleDef::Composite { description, .. } => description,
        }
    }
}

/// Mapping from rule name to definition, insertion-ordered.
#[derive(Default)]
pub struct Catalog {
    order: Vec<String>,
    defs: HashMap<String, RuleDef>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition under a unique name.
    pub fn register(&mut self, name: impl Into<String>, def: RuleDef) -> Result<(), ActivationError> {
        let name = name.into();
        if self.defs.contains_key(&name) {
            return Err(ActivationError::DuplicateRule(name));
        }
        self.order.push(name.clone());
        self.defs.insert(name, def);
        Ok(())
    }

    /// Register an executable rule under its own name.
    pub fn register_rule(&mut self, rule: Arc<dyn Rule>) -> Result<(), ActivationError> {
        self.register(rule.name().to_string(), RuleDef::Single(rule))
    }

    /// Register a composite: an ordered list of other rule names.
    pub fn register_composite(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        includes: Vec<String>,
    ) -> Result<(), ActivationError> {
        self.register(
            name,
            RuleDef::Composite {
                description: description.into(),
                includes,
            },
        )
    }

    pub fn contains(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    /// Registered names with their descriptions, in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &RuleDef)> {
        self.order
            .iter()
            .map(move |n| (n.as_str(), &self.defs[n]))
    }

    /// Resolve a set of rule names into the ordered executable rule list.
    ///
    /// Composite references expand recursively, once, at this point -
    /// traversal cost is then paid per sub-rule, not per nested lookup. A
    /// rule reachable via multiple paths runs exactly once, at its
    /// first-reachable position; the result is deterministic for a given
    /// input list. Cycles and unknown names fail the whole activation.
    pub fn activate(&self, names: &[String]) -> Result<Vec<Arc<dyn Rule>>, ActivationError> {
        let mut active: Vec<Arc<dyn Rule>> = Vec::new();
        let mut seen: Vec<String> = Vec::new();
        let mut stack: Vec<String> = Vec::new();
        for name in names {
            self.expand(name, &mut stack, &mut seen, &mut active)?;
        }
        Ok(active)
    }

    fn expand(
        &self,
        name: &str,
        stack: &mut Vec<String>,
        seen: &mut Vec<String>,
        active: &mut Vec<Arc<dyn Rule>>,
    ) -> Result<(), ActivationError> {
        if let Some(pos) = stack.iter().position(|n| n == name) {
            let mut cycle: Vec<String> = stack[pos..].to_vec();
            cycle.push(name.to_string());
            return Err(ActivationError::CyclicComposite { cycle });
        }
        match self.defs.get(name) {
            None => Err(ActivationError::UnknownRule(name.to_string())),
            Some(RuleDef::Single(rule)) => {
                if !seen.iter().any(|n| n == name) {
                    seen.push(name.to_string());
                    active.push(Arc::clone(rule));
                }
                Ok(())
            }
            Some(RuleDef::Composite { includes, .. }) => {
                if seen.iter().any(|n| n == name) {
                    return Ok(());
                }
                seen.push(name.to_string());
                stack.push(name.to_string());
                for include in includes {
                    self.expand(include, stack, seen, active)?;
                }
                stack.pop();
                Ok(())
            }
        }
    }
}
