//! Per-pass execution context threaded through a traversal.
//!
//! One context lives for one document for one pass of the active rule set.
//! Rules use it for cross-node bookkeeping ("already inserted that import",
//! "anchor node seen") and the engine appends recovered-failure messages to
//! it, so a pass leaves an auditable trail without any global state.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Severity of a message recorded during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Note,
    Warning,
    Error,
}

/// A message appended during a pass, attributed to the rule that caused it.
#[derive(Debug, Clone)]
pub struct RuleMessage {
    pub severity: Severity,
    pub rule: String,
    pub detail: String,
}

/// Mutable scratch space scoped to one document-traversal pass.
///
/// Values are stored as JSON so rules can stash anything serde-serializable
/// under an opaque string key. The message log is append-only.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    values: HashMap<String, Value>,
    messages: Vec<RuleMessage>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under `key`, replacing any previous value.
    pub fn put<T: Serialize>(&mut self, key: impl Into<String>, value: T) {
        if let Ok(v) = serde_json::to_value(value) {
            self.values.insert(key.into(), v);
        }
    }

    /// Fetch and deserialize the value under `key`, if present and typed.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Shorthand for boolean markers ("did rule X already do Y this pass").
    pub fn set_flag(&mut self, key: impl Into<String>) {
        self.values.insert(key.into(), Value::Bool(true));
    }

    pub fn flag(&self, key: &str) -> bool {
        matches!(self.values.get(key), Some(Value::Bool(true)))
    }

    pub fn push_message(&mut self, severity: Severity, rule: impl Into<String>, detail: impl Into<String>) {
        self.messages.push(RuleMessage {
            severity,
            rule: rule.into(),
            detail: detail.into(),
        });
    }

    pub fn messages(&self) -> &[RuleMessage] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<RuleMessage> {
        self.messages
    }
}
