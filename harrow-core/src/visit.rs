//! Generic tree traversal: the engine every rule runs through.
//!
//! ## Algorithm
//! Recursive pre-order walk. At each node:
//! 1. Invoke the rule's matcher; on a match, invoke the transform and vet
//!    its output (own invariants plus slot compatibility with the node it
//!    replaces). A bad output is discarded - the original node stays, the
//!    failure is logged to the context - and the walk continues.
//! 2. Recurse into the children of whichever node now occupies the
//!    position, so a reshaped node has its new children visited in the
//!    same pass.
//! 3. Children are rebuilt bottom-up via [`TreeNode::map_children`]; a node
//!    is replaced in its parent only once its whole subtree is final. Rules
//!    that opt in get a post-order hook here, seeing the node with its
//!    rebuilt subtree.
//!
//! Recursion depth is bounded; a rule that keeps growing the tree under
//! itself hits [`RewriteError::TraversalOverflow`], which aborts this rule
//! application on this document and nothing else.

use crate::context::{ExecutionContext, Severity};
use crate::error::{RewriteError, StructuralViolation};
use crate::rule::TreeRule;
use crate::tree::TreeNode;

/// Default bound on traversal depth. Far beyond any real descriptor or
/// compilation unit; reached only by runaway self-replacement.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Per-traversal configuration and attribution.
pub struct Traversal<'a> {
    pub rule_name: &'a str,
    pub origin: &'a str,
    pub max_depth: usize,
}

/// Walk `root` applying `rule`, returning the (possibly) rebuilt tree and
/// whether anything structurally changed.
pub fn traverse<N, R>(
    root: N,
    rule: &R,
    ctx: &mut ExecutionContext,
    cfg: &Traversal<'_>,
) -> Result<(N, bool), RewriteError>
where
    N: TreeNode,
    R: TreeRule<N> + ?Sized,
{
    walk(root, rule, ctx, cfg, 0)
}

fn walk<N, R>(
    node: N,
    rule: &R,
    ctx: &mut ExecutionContext,
    cfg: &Traversal<'_>,
    depth: usize,
) -> Result<(N, bool), RewriteError>
where
    N: TreeNode,
    R: TreeRule<N> + ?Sized,
{
    if depth > cfg.max_depth {
        return Err(RewriteError::TraversalOverflow {
            origin: cfg.origin.to_string(),
            rule: cfg.rule_name.to_string(),
            max_depth: cfg.max_depth,
        });
    }

    let mut changed = false;
    let mut current = node;

    if rule.matches(&current) {
        let original = current.clone();
        let result = rule.transform(current, ctx);
        current = accept(original, result, ctx, cfg, &mut changed);
    }

    let (rebuilt, child_changed) =
        current.map_children(&mut |child| walk(child, rule, ctx, cfg, depth + 1))?;
    let mut current = rebuilt;
    changed |= child_changed;

    // Post hook: a second look at the node with its subtree final.
    if rule.matches_post(&current) {
        let original = current.clone();
        let result = rule.transform_post(current, ctx);
        current = accept(original, result, ctx, cfg, &mut changed);
    }

    Ok((current, changed))
}

/// Vet a transform's output and either take it or fall back to the
/// original node, logging the discarded attempt.
fn accept<N: TreeNode>(
    original: N,
    result: Result<N, StructuralViolation>,
    ctx: &mut ExecutionContext,
    cfg: &Traversal<'_>,
    changed: &mut bool,
) -> N {
    match result.and_then(|candidate| {
        vet(&original, &candidate)?;
        Ok(candidate)
    }) {
        Ok(candidate) => {
            if !candidate.structural_eq(&original) {
                *changed = true;
            }
            candidate
        }
        Err(violation) => {
            recover(ctx, cfg, &original, violation);
            original
        }
    }
}

/// Structural vetting of a transform's output.
fn vet<N: TreeNode>(original: &N, candidate: &N) -> Result<(), StructuralViolation> {
    candidate.validate()?;
    if !original.slot_compatible(candidate) {
        return Err(StructuralViolation::new(format!(
            "{} cannot stand in for {}",
            candidate.label(),
            original.label()
        )));
    }
    Ok(())
}

/// Discard a single rewrite attempt: log it, keep the original node.
fn recover<N: TreeNode>(
    ctx: &mut ExecutionContext,
    cfg: &Traversal<'_>,
    original: &N,
    violation: StructuralViolation,
) {
    let err = RewriteError::InvalidRewrite {
        rule: cfg.rule_name.to_string(),
        node: original.label(),
        violation,
    };
    tracing::warn!(origin = cfg.origin, "{err}");
    ctx.push_message(Severity::Warning, cfg.rule_name, err.to_string());
}
