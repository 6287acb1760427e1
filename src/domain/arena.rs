use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;
use uuid::Uuid;

use crate::domain::literal::Literal;

/// Handle of a node inside one `ExprArena`.
pub type NodeId = Index;

/// Identity of one tree. Two arenas never share a `TreeId`, so
/// `(TreeId, NodeId)` identifies a node instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeId(Uuid);

impl TreeId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Operator of a compound node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Multiply,
    Group,
}

impl Operator {
    /// Symbol used by the diagnostic dump.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Multiply => "*",
            Operator::Group => "()",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Payload of a tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Compound(Operator),
    Literal(Literal),
}

impl NodeKind {
    pub fn operator(&self) -> Option<Operator> {
        match self {
            NodeKind::Compound(op) => Some(*op),
            NodeKind::Literal(_) => None,
        }
    }

    pub fn literal(&self) -> Option<&Literal> {
        match self {
            NodeKind::Compound(_) => None,
            NodeKind::Literal(literal) => Some(literal),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Compound(op) => write!(f, "{}", op),
            NodeKind::Literal(literal) => write!(f, "{}", literal),
        }
    }
}

/// Tree node in the arena-based expression structure.
#[derive(Debug)]
pub struct ExprNode {
    /// Operator or literal carried by this node
    pub kind: NodeKind,
    /// Index of parent node in the arena, None for the root and detached nodes
    pub parent: Option<NodeId>,
    /// Indices of child nodes in the arena, in expression order
    pub children: Vec<NodeId>,
}

/// Arena-based expression tree.
///
/// The arena owns every node; parent and child links are plain indices, so a
/// back-reference can never keep a node alive or free it. At most one node
/// per tree carries the ghost marker.
#[derive(Debug)]
pub struct ExprArena {
    id: TreeId,
    arena: Arena<ExprNode>,
    root: Option<NodeId>,
    ghost: Option<NodeId>,
}

impl Default for ExprArena {
    fn default() -> Self {
        Self::new()
    }
}

impl ExprArena {
    pub fn new() -> Self {
        Self {
            id: TreeId::new(),
            arena: Arena::new(),
            root: None,
            ghost: None,
        }
    }

    pub fn id(&self) -> TreeId {
        self.id
    }

    /// Insert a node, appending it to `parent`'s children when given.
    ///
    /// Does not touch the root; call `set_root` once the tree is assembled.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let node = ExprNode {
            kind,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        }

        node_idx
    }

    /// Attach an existing node as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.arena.get_mut(parent) {
            node.children.push(child);
        }
        self.set_parent(child, Some(parent));
    }

    /// Replace the child list of `parent`, reparenting every new child.
    pub fn replace_children(&mut self, parent: NodeId, children: Vec<NodeId>) {
        for &child in &children {
            self.set_parent(child, Some(parent));
        }
        if let Some(node) = self.arena.get_mut(parent) {
            node.children = children;
        }
    }

    /// Detach and return the children of `id`. Their parent links are left
    /// for the caller to rewrite.
    pub fn take_children(&mut self, id: NodeId) -> Vec<NodeId> {
        self.arena
            .get_mut(id)
            .map(|node| std::mem::take(&mut node.children))
            .unwrap_or_default()
    }

    /// Remove `id` and everything below it, unlinking it from its parent.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_subtree(&mut self, id: NodeId) {
        if let Some(parent_idx) = self.parent(id) {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.retain(|&child| child != id);
            }
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.remove(current) {
                stack.extend(node.children);
            }
            if self.ghost == Some(current) {
                self.ghost = None;
            }
            if self.root == Some(current) {
                self.root = None;
            }
        }
    }

    pub fn get_node(&self, idx: NodeId) -> Option<&ExprNode> {
        self.arena.get(idx)
    }

    pub fn contains(&self, idx: NodeId) -> bool {
        self.arena.contains(idx)
    }

    pub fn kind(&self, idx: NodeId) -> Option<&NodeKind> {
        self.arena.get(idx).map(|node| &node.kind)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, idx: NodeId) {
        self.set_parent(idx, None);
        self.root = Some(idx);
    }

    /// Parent back-reference of `idx`.
    pub fn parent(&self, idx: NodeId) -> Option<NodeId> {
        self.arena.get(idx).and_then(|node| node.parent)
    }

    /// Rewrite the parent back-reference only. Child lists are untouched.
    pub fn set_parent(&mut self, idx: NodeId, parent: Option<NodeId>) {
        if let Some(node) = self.arena.get_mut(idx) {
            node.parent = parent;
        }
    }

    /// Read-only child listing; empty for literals and unknown nodes.
    pub fn children(&self, idx: NodeId) -> &[NodeId] {
        self.arena
            .get(idx)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Position of `idx` among its parent's children.
    pub fn position_in_parent(&self, idx: NodeId) -> Option<usize> {
        let parent = self.parent(idx)?;
        self.children(parent).iter().position(|&child| child == idx)
    }

    /// Child positions leading from the root to `idx`, built by walking the
    /// parent links upwards. `None` if `idx` is not attached to the root.
    pub fn path_of(&self, idx: NodeId) -> Option<Vec<usize>> {
        let mut path = Vec::new();
        let mut current = idx;
        while let Some(parent) = self.parent(current) {
            path.push(self.position_in_parent(current)?);
            current = parent;
        }
        if self.root != Some(current) {
            return None;
        }
        path.reverse();
        Some(path)
    }

    /// Follow child positions from the root.
    pub fn node_at_path(&self, path: &[usize]) -> Option<NodeId> {
        let mut current = self.root?;
        for &position in path {
            current = *self.children(current).get(position)?;
        }
        Some(current)
    }

    pub fn ghost(&self) -> Option<NodeId> {
        self.ghost
    }

    pub fn is_ghost(&self, idx: NodeId) -> bool {
        self.ghost == Some(idx)
    }

    pub(crate) fn set_ghost(&mut self, idx: Option<NodeId>) {
        self.ghost = idx;
    }

    /// Drop the ghost marker, e.g. once a placement has been committed.
    pub fn clear_ghost(&mut self) {
        self.ghost = None;
    }

    /// Depth-first search below `from` for the ghost-marked node.
    #[instrument(level = "trace", skip(self))]
    pub fn find_ghost(&self, from: NodeId) -> Option<NodeId> {
        let ghost = self.ghost?;
        let mut stack = vec![from];
        while let Some(current) = stack.pop() {
            if current == ghost {
                return Some(current);
            }
            stack.extend(self.children(current).iter().rev());
        }
        None
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn iter(&self) -> TreeIterator {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator {
        PostOrderIterator::new(self)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, node_idx: NodeId) -> usize {
        1 + self
            .children(node_idx)
            .iter()
            .map(|&child| self.calculate_depth(child))
            .max()
            .unwrap_or(0)
    }

    /// Literals in left-to-right order.
    pub fn literals(&self) -> Vec<&Literal> {
        self.iter()
            .filter_map(|(_, node)| node.kind.literal())
            .collect()
    }
}

pub struct TreeIterator<'a> {
    arena: &'a ExprArena,
    stack: Vec<NodeId>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a ExprArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeId, &'a ExprNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a ExprArena,
    stack: Vec<(NodeId, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a ExprArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push((root, false));
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (NodeId, &'a ExprNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
