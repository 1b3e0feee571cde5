//! harrow-core: tree-rewrite framework-migration engine
//!
//! This library provides:
//! - Immutable, copy-on-write tree models for three document kinds
//!   (language-source AST, build descriptor, flat configuration)
//! - A generic visitor engine with bounded, bottom-up rewriting
//! - Composable named rules with catalog activation and cycle detection
//! - A convergence driver that re-applies the active rule set until a
//!   pass produces no change
//! - Text adapters for the two data-document kinds and a built-in
//!   Quarkus migration catalog

pub mod catalog;
pub mod context;
pub mod diff;
pub mod driver;
pub mod error;
pub mod manifest;
pub mod parse;
pub mod quarkus;
pub mod rule;
pub mod rules;
pub mod semantics;
pub mod tree;
pub mod visit;

pub use catalog::{Catalog, RuleDef};
pub use context::{ExecutionContext, RuleMessage, Severity};
pub use diff::{diff, ChangeSet};
pub use driver::{migrate, migrate_document, DocumentOutcome, MigrationOptions};
pub use error::{ActivationError, ParseError, RewriteError, StructuralViolation};
pub use manifest::{parse_manifest, register_manifest};
pub use parse::{parse_pom, parse_properties, write_pom, write_properties};
pub use rule::{BuildRule, ConfigRule, Precondition, Rule, SourceRule, SourceTreeRule, TreeRule};
pub use semantics::TypeTable;
pub use tree::{
    Document, DocumentBody, DocumentKind, JavaNode, NodeId, PomFile, PomNode, PropsNode,
    SourceFile, TreeNode,
};
pub use visit::{traverse, Traversal, DEFAULT_MAX_DEPTH};
