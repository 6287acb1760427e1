//! Text renderings of expression trees.

use itertools::Itertools;
use termtree::Tree;

use crate::domain::arena::{ExprArena, NodeId, NodeKind, Operator};

impl ExprArena {
    /// Diagnostic dump of the subtree at `id`.
    ///
    /// One line per node in pre-order: the operator symbol or literal text,
    /// indented with one tab per level starting at `indent_level`, each line
    /// terminated by `\n`.
    pub fn convert_to_string(&self, id: NodeId, indent_level: usize) -> String {
        let mut out = String::new();
        self.write_node(&mut out, id, indent_level);
        out
    }

    fn write_node(&self, out: &mut String, id: NodeId, indent_level: usize) {
        let Some(node) = self.get_node(id) else {
            return;
        };
        for _ in 0..indent_level {
            out.push('\t');
        }
        out.push_str(&node.kind.to_string());
        out.push('\n');
        for &child in &node.children {
            self.write_node(out, child, indent_level + 1);
        }
    }

    /// Dump of the whole tree; empty for an empty arena.
    pub fn dump(&self) -> String {
        self.root()
            .map(|root| self.convert_to_string(root, 0))
            .unwrap_or_default()
    }

    /// Compact infix form, e.g. `2*x+(7+6*z)`.
    ///
    /// Parsing the result again yields the same tree.
    pub fn to_infix(&self) -> String {
        self.root()
            .map(|root| self.infix_of(root))
            .unwrap_or_default()
    }

    pub fn infix_of(&self, id: NodeId) -> String {
        let Some(node) = self.get_node(id) else {
            return String::new();
        };
        match &node.kind {
            NodeKind::Literal(literal) => literal.text().to_string(),
            NodeKind::Compound(Operator::Group) => {
                format!(
                    "({})",
                    node.children.iter().map(|&c| self.infix_of(c)).join("")
                )
            }
            NodeKind::Compound(Operator::Add) => {
                node.children.iter().map(|&c| self.infix_of(c)).join("+")
            }
            NodeKind::Compound(Operator::Multiply) => {
                node.children.iter().map(|&c| self.infix_of(c)).join("*")
            }
        }
    }
}

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

// Box-drawing rendering; the ghost node, if any, is suffixed with " *"
impl TreeNodeConvert for ExprArena {
    fn to_tree_string(&self) -> Tree<String> {
        fn label(arena: &ExprArena, idx: NodeId) -> String {
            match arena.kind(idx) {
                Some(kind) if arena.is_ghost(idx) => format!("{} *", kind),
                Some(kind) => kind.to_string(),
                None => String::new(),
            }
        }

        fn build_tree(arena: &ExprArena, node_idx: NodeId, parent_tree: &mut Tree<String>) {
            for &child_idx in arena.children(node_idx) {
                let mut child_tree = Tree::new(label(arena, child_idx));
                build_tree(arena, child_idx, &mut child_tree);
                parent_tree.push(child_tree);
            }
        }

        if let Some(root_idx) = self.root() {
            let mut tree = Tree::new(label(self, root_idx));
            build_tree(self, root_idx, &mut tree);
            tree
        } else {
            Tree::new("Empty tree".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parser::ExpressionParser;

    #[test]
    fn given_tree_when_dumping_subtree_then_indents_from_level() {
        let tree = ExpressionParser::new().parse("4*(z+5*x)").unwrap();
        let group = tree.node_at_path(&[1]).unwrap();
        assert_eq!(
            tree.convert_to_string(group, 1),
            "\t()\n\t\t+\n\t\t\tz\n\t\t\t*\n\t\t\t\t5\n\t\t\t\tx\n"
        );
    }

    #[test]
    fn given_tree_when_rendering_infix_then_reparses_identically() {
        let parser = ExpressionParser::new();
        let tree = parser.parse("2*x + 3*y + 4*z + (7 + 6*z)").unwrap();
        assert_eq!(tree.to_infix(), "2*x+3*y+4*z+(7+6*z)");
        let again = parser.parse(&tree.to_infix()).unwrap();
        assert_eq!(again.dump(), tree.dump());
    }

    #[test]
    fn given_tree_when_rendering_box_tree_then_lists_every_node() {
        let tree = ExpressionParser::new().parse("a+b").unwrap();
        let rendered = tree.to_tree_string().to_string();
        assert!(rendered.starts_with("+\n"));
        assert!(rendered.contains("a"));
        assert!(rendered.contains("b"));
        assert_eq!(ExprArena::new().to_tree_string().to_string(), "Empty tree\n");
    }
}
