//! Deep copies and placement search.
//!
//! A placement is a full copy of a tree in which one node (`search`) has
//! been moved to another slot among its siblings. Enumerating slot
//! `0, 1, 2, ...` until [`PlacementError::NoMoreCombinations`] yields every
//! legal rearrangement, the original order included.

use std::iter::FusedIterator;

use tracing::{debug, instrument, warn};

use crate::domain::arena::{ExprArena, NodeId};
use crate::domain::error::PlacementError;

/// One candidate tree plus the relocated node inside it.
#[derive(Debug)]
pub struct Placement {
    tree: ExprArena,
    ghost: NodeId,
}

impl Placement {
    pub fn tree(&self) -> &ExprArena {
        &self.tree
    }

    /// Copy of the relocated node, also flagged as the tree's ghost.
    pub fn ghost(&self) -> NodeId {
        self.ghost
    }

    /// Sibling position the relocated node landed on.
    pub fn slot(&self) -> Option<usize> {
        self.tree.position_in_parent(self.ghost)
    }

    pub fn into_tree(self) -> ExprArena {
        self.tree
    }
}

#[derive(Debug, Clone, Copy)]
struct Relocation {
    search: NodeId,
    slot: usize,
}

/// Recursive clone from one arena into a fresh one.
struct Cloner<'a> {
    source: &'a ExprArena,
    target: ExprArena,
    relocation: Option<Relocation>,
    ghost: Option<NodeId>,
}

impl<'a> Cloner<'a> {
    fn new(source: &'a ExprArena, relocation: Option<Relocation>) -> Self {
        Self {
            source,
            target: ExprArena::new(),
            relocation,
            ghost: None,
        }
    }

    fn clone_node(&mut self, id: NodeId) -> Result<Option<NodeId>, PlacementError> {
        let Some(node) = self.source.get_node(id) else {
            return Ok(None);
        };
        let copy = self.target.insert_node(node.kind.clone(), None);

        let mut order = node.children.clone();
        if let Some(relocation) = self.relocation {
            if order.contains(&relocation.search) {
                if relocation.slot >= order.len() {
                    return Err(PlacementError::NoMoreCombinations {
                        index: relocation.slot,
                        siblings: order.len(),
                    });
                }
                order.retain(|&child| child != relocation.search);
                order.insert(relocation.slot, relocation.search);
            }
        }

        for child in order {
            if let Some(child_copy) = self.clone_node(child)? {
                self.target.append_child(copy, child_copy);
                if self.relocation.is_some_and(|r| r.search == child) {
                    self.ghost = Some(child_copy);
                }
            }
        }
        Ok(Some(copy))
    }
}

/// Structural clone of the subtree at `node` into a new arena.
///
/// Operators, literals and child order are preserved, parent links are
/// rebuilt, and the copy carries no ghost marker.
#[instrument(level = "debug", skip(tree))]
pub fn deep_copy(tree: &ExprArena, node: NodeId) -> ExprArena {
    let mut cloner = Cloner::new(tree, None);
    // Without a relocation the clone cannot fail
    let root = cloner.clone_node(node).ok().flatten();
    let mut copy = cloner.target;
    if let Some(root) = root {
        copy.set_root(root);
    }
    copy
}

/// Clone the subtree at `node`, moving `search` to `target_index` among its
/// siblings.
///
/// Only the level where `search` is a direct child is reordered; the other
/// children there keep their relative order. Every other level is copied
/// verbatim. The copy of `search` becomes the ghost of the new tree.
///
/// # Errors
///
/// [`PlacementError::NoMoreCombinations`] when `target_index` is not a valid
/// slot. Because a root has no siblings, the same happens when `search` is
/// `node` itself or lies outside the cloned subtree.
#[instrument(level = "debug", skip(tree))]
pub fn deep_copy_with_placement(
    tree: &ExprArena,
    node: NodeId,
    target_index: usize,
    search: NodeId,
) -> Result<Placement, PlacementError> {
    let mut cloner = Cloner::new(
        tree,
        Some(Relocation {
            search,
            slot: target_index,
        }),
    );
    let root = cloner.clone_node(node)?;

    match (root, cloner.ghost) {
        (Some(root), Some(ghost)) => {
            let mut copy = cloner.target;
            copy.set_root(root);
            copy.set_ghost(Some(ghost));
            Ok(Placement { tree: copy, ghost })
        }
        _ => Err(PlacementError::NoMoreCombinations {
            index: target_index,
            siblings: 0,
        }),
    }
}

/// Lazy enumeration of every placement of `search` within a tree.
///
/// Yields one candidate per sibling slot, in slot order, then stops.
pub struct Placements<'a> {
    tree: &'a ExprArena,
    search: NodeId,
    next_slot: usize,
    done: bool,
}

impl Iterator for Placements<'_> {
    type Item = Placement;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let Some(root) = self.tree.root() else {
            self.done = true;
            return None;
        };
        match deep_copy_with_placement(self.tree, root, self.next_slot, self.search) {
            Ok(placement) => {
                self.next_slot += 1;
                Some(placement)
            }
            Err(PlacementError::NoMoreCombinations { index, siblings }) => {
                debug!(index, siblings, "placements exhausted");
                self.done = true;
                None
            }
        }
    }
}

impl FusedIterator for Placements<'_> {}

/// Start a lazy placement enumeration for `search`.
pub fn placements(tree: &ExprArena, search: NodeId) -> Placements<'_> {
    Placements {
        tree,
        search,
        next_slot: 0,
        done: false,
    }
}

/// Every placement of `search` among its siblings, one per slot.
///
/// `search` must not be the root; a root has no siblings and the result is
/// empty.
#[instrument(level = "debug", skip(tree))]
pub fn build_placements(tree: &ExprArena, search: NodeId) -> Vec<Placement> {
    if tree.root() == Some(search) {
        warn!("build_placements called with the root as search node");
        return Vec::new();
    }
    let candidates: Vec<Placement> = placements(tree, search).collect();
    debug!(count = candidates.len(), "built placements");
    candidates
}

/// Index of the candidate with the smallest score.
///
/// `score` is the host's distance metric. NaN scores are skipped and ties
/// keep the earliest candidate.
pub fn closest_placement<F>(candidates: &[Placement], mut score: F) -> Option<usize>
where
    F: FnMut(&Placement) -> f64,
{
    let mut best: Option<(usize, f64)> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let value = score(candidate);
        if value.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, current)| value < current) {
            best = Some((index, value));
        }
    }
    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parser::ExpressionParser;

    #[test]
    fn given_placement_when_inspecting_then_slot_matches_index() {
        let tree = ExpressionParser::new().parse("a+b+c").unwrap();
        let b = tree.node_at_path(&[1]).unwrap();
        let root = tree.root().unwrap();

        let placement = deep_copy_with_placement(&tree, root, 2, b).unwrap();
        assert_eq!(placement.slot(), Some(2));
        assert_eq!(placement.tree().to_infix(), "a+c+b");
        assert_eq!(placement.tree().ghost(), Some(placement.ghost()));
    }

    #[test]
    fn given_out_of_range_slot_when_placing_then_no_more_combinations() {
        let tree = ExpressionParser::new().parse("a+b+c").unwrap();
        let b = tree.node_at_path(&[1]).unwrap();
        let root = tree.root().unwrap();

        let err = deep_copy_with_placement(&tree, root, 3, b).unwrap_err();
        assert_eq!(
            err,
            PlacementError::NoMoreCombinations {
                index: 3,
                siblings: 3
            }
        );
    }

    #[test]
    fn given_root_as_search_when_placing_then_no_slot_exists() {
        let tree = ExpressionParser::new().parse("a+b").unwrap();
        let root = tree.root().unwrap();
        assert!(deep_copy_with_placement(&tree, root, 0, root).is_err());
        assert!(build_placements(&tree, root).is_empty());
    }

    #[test]
    fn given_scores_when_choosing_then_takes_smallest_and_skips_nan() {
        let tree = ExpressionParser::new().parse("a+b+c").unwrap();
        let a = tree.node_at_path(&[0]).unwrap();
        let candidates = build_placements(&tree, a);

        let scores = [f64::NAN, 4.0, 1.5];
        let chosen = closest_placement(&candidates, |p| scores[p.slot().unwrap()]);
        assert_eq!(chosen, Some(2));

        let ties = closest_placement(&candidates, |_| 1.0);
        assert_eq!(ties, Some(0));
        assert_eq!(closest_placement(&[], |_| 0.0), None);
    }
}
