//! Object tree traversal

use crate::error::VariantError;
use av_asset::ObjectNode;

/// Per-node operation applied during a walk
///
/// Returns whether the node was changed.
pub trait NodeVisitor {
    /// Visit one node
    ///
    /// # Errors
    /// Any error aborts the walk
    fn visit(&mut self, node: &mut ObjectNode) -> Result<bool, VariantError>;
}

impl<F> NodeVisitor for F
where
    F: FnMut(&mut ObjectNode) -> Result<bool, VariantError>,
{
    fn visit(&mut self, node: &mut ObjectNode) -> Result<bool, VariantError> {
        self(node)
    }
}

/// Counts gathered by a walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Nodes visited
    pub visited: usize,
    /// Nodes the visitor reported as changed
    pub changed: usize,
}

impl std::ops::AddAssign for WalkSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.visited += rhs.visited;
        self.changed += rhs.changed;
    }
}

/// Apply `visitor` to `node` and every descendant, pre-order
///
/// A parent is visited before its children and siblings in order. The walk
/// keeps an explicit stack, so depth is bounded by memory rather than the call
/// stack.
///
/// # Errors
/// Returns the first visitor error; nodes after it are not visited
pub fn walk<V>(node: &mut ObjectNode, visitor: &mut V) -> Result<WalkSummary, VariantError>
where
    V: NodeVisitor + ?Sized,
{
    let mut summary = WalkSummary::default();
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        if visitor.visit(current)? {
            summary.changed += 1;
        }
        summary.visited += 1;
        stack.extend(current.children_mut().iter_mut().rev());
    }
    Ok(summary)
}

/// [`walk`] each root in order
///
/// # Errors
/// Returns the first visitor error
pub fn walk_all<V>(roots: &mut [ObjectNode], visitor: &mut V) -> Result<WalkSummary, VariantError>
where
    V: NodeVisitor + ?Sized,
{
    let mut summary = WalkSummary::default();
    for root in roots {
        summary += walk(root, visitor)?;
    }
    Ok(summary)
}
