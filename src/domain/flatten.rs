//! Normalization: collapse runs of the same operator into one node.

use tracing::instrument;

use crate::domain::arena::{ExprArena, NodeId, NodeKind};

/// Flatten the whole tree in place. Idempotent.
///
/// Nodes are visited in post-order, so every child is already flat when its
/// parent absorbs it.
#[instrument(level = "debug", skip(tree), fields(nodes = tree.len()))]
pub fn flatten(tree: &mut ExprArena) {
    let order: Vec<NodeId> = tree.iter_postorder().map(|(id, _)| id).collect();
    for id in order {
        splice_same_operator(tree, id);
    }
}

/// Replace each child with the same operator as `id` by its own children,
/// in place. Add never absorbs Group and Group only absorbs Group, so
/// parentheses stay an opacity boundary.
fn splice_same_operator(tree: &mut ExprArena, id: NodeId) {
    let Some(operator) = tree.kind(id).and_then(NodeKind::operator) else {
        return;
    };

    let children = tree.children(id).to_vec();
    let mut flattened = Vec::with_capacity(children.len());
    for child in children {
        if tree.kind(child).and_then(NodeKind::operator) == Some(operator) {
            flattened.extend(tree.take_children(child));
            tree.remove_subtree(child);
        } else {
            flattened.push(child);
        }
    }
    tree.replace_children(id, flattened);
}
