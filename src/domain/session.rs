//! Drag-and-drop reordering without geometry.
//!
//! Mirrors the interactive press/drag/release cycle: pick a focus node,
//! generate every placement for it, let the host score the candidates
//! against its own pointer position, and commit the closest one.

use tracing::{debug, info, instrument};

use crate::domain::arena::{ExprArena, NodeId, TreeId};
use crate::domain::error::DragError;
use crate::domain::placement::{build_placements, closest_placement, Placement};

#[derive(Debug)]
struct DragState {
    candidates: Vec<Placement>,
    chosen: usize,
}

#[derive(Debug)]
pub struct DragSession {
    tree: ExprArena,
    focus: NodeId,
    drag: Option<DragState>,
}

impl DragSession {
    /// Start a session with the focus on the root.
    pub fn new(tree: ExprArena) -> Result<Self, DragError> {
        let focus = tree.root().ok_or(DragError::EmptyTree)?;
        Ok(Self {
            tree,
            focus,
            drag: None,
        })
    }

    pub fn tree(&self) -> &ExprArena {
        &self.tree
    }

    pub fn into_tree(self) -> ExprArena {
        self.tree
    }

    pub fn focused(&self) -> NodeId {
        self.focus
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Focus node `id` of tree `tree`.
    ///
    /// Handles are only valid for the tree they came from; after a drop the
    /// session holds a new tree and older handles are rejected.
    pub fn focus(&mut self, tree: TreeId, id: NodeId) -> Result<(), DragError> {
        if self.drag.is_some() {
            return Err(DragError::DragInProgress);
        }
        if tree != self.tree.id() || self.tree.path_of(id).is_none() {
            return Err(DragError::UnknownNode);
        }
        self.focus = id;
        Ok(())
    }

    /// Move the focus to the `index`-th child of the focused node.
    pub fn focus_child(&mut self, index: usize) -> Result<NodeId, DragError> {
        if self.drag.is_some() {
            return Err(DragError::DragInProgress);
        }
        let child = *self
            .tree
            .children(self.focus)
            .get(index)
            .ok_or(DragError::UnknownNode)?;
        self.focus(self.tree.id(), child)?;
        Ok(child)
    }

    /// Move the focus up one level; `None` when already at the root.
    pub fn focus_parent(&mut self) -> Option<NodeId> {
        if self.drag.is_some() {
            return None;
        }
        let parent = self.tree.parent(self.focus)?;
        self.focus = parent;
        Some(parent)
    }

    /// Generate all placements for the focused node.
    ///
    /// Returns the number of candidates. The candidate for the node's
    /// current slot is chosen until `update` picks another.
    #[instrument(level = "debug", skip(self))]
    pub fn begin_drag(&mut self) -> Result<usize, DragError> {
        if self.drag.is_some() {
            return Err(DragError::DragInProgress);
        }
        if self.tree.root() == Some(self.focus) {
            return Err(DragError::RootNotMovable);
        }
        let candidates = build_placements(&self.tree, self.focus);
        let chosen = self.tree.position_in_parent(self.focus).unwrap_or(0);
        let count = candidates.len();
        debug!(count, chosen, "drag started");
        self.drag = Some(DragState { candidates, chosen });
        Ok(count)
    }

    pub fn candidates(&self) -> &[Placement] {
        self.drag
            .as_ref()
            .map(|state| state.candidates.as_slice())
            .unwrap_or(&[])
    }

    /// Currently chosen candidate while dragging.
    pub fn chosen(&self) -> Option<&Placement> {
        let state = self.drag.as_ref()?;
        state.candidates.get(state.chosen)
    }

    /// Re-score the candidates and remember the closest one.
    pub fn update<F>(&mut self, score: F) -> Option<usize>
    where
        F: FnMut(&Placement) -> f64,
    {
        let state = self.drag.as_mut()?;
        if let Some(index) = closest_placement(&state.candidates, score) {
            state.chosen = index;
        }
        Some(state.chosen)
    }

    /// Commit the chosen candidate.
    ///
    /// The candidate becomes the session's tree with its ghost cleared, and
    /// the focus follows the relocated node. Returns the new focus.
    #[instrument(level = "debug", skip(self))]
    pub fn drop_focused(&mut self) -> Result<NodeId, DragError> {
        let state = self.drag.take().ok_or(DragError::NotDragging)?;
        let placement = state
            .candidates
            .into_iter()
            .nth(state.chosen)
            .ok_or(DragError::NotDragging)?;

        let ghost = placement.ghost();
        let mut tree = placement.into_tree();
        tree.clear_ghost();
        info!("dropped into {}", tree.to_infix());

        self.tree = tree;
        self.focus = ghost;
        Ok(ghost)
    }

    /// Abandon the drag and keep the current tree.
    pub fn cancel(&mut self) {
        self.drag = None;
    }
}
