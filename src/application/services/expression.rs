//! Expression service
//!
//! Parses, renders and rearranges expressions on behalf of the CLI.

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::{OutputFormat, Settings};
use crate::domain::{
    build_placements, deep_copy_with_placement, parse_node_path, DomainError, DragError,
    ExprArena, ExpressionParser, NodeId, ParserOptions, Placement, PlacementError,
    TreeNodeConvert,
};

/// One placement together with where its relocated node ended up.
#[derive(Debug)]
pub struct Candidate {
    /// Sibling slot of the relocated node
    pub slot: usize,
    /// Child path of the relocated node from the root
    pub ghost_path: Vec<usize>,
    pub placement: Placement,
}

/// Service for parsing and rearranging expressions.
#[derive(Debug, Clone, Default)]
pub struct ExpressionService {
    parser: ExpressionParser,
}

impl ExpressionService {
    pub fn new(options: ParserOptions) -> Self {
        Self {
            parser: ExpressionParser::with_options(options),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.parser_options())
    }

    pub fn parser(&self) -> &ExpressionParser {
        &self.parser
    }

    pub fn parse(&self, text: &str) -> ApplicationResult<ExprArena> {
        Ok(self.parser.parse(text)?)
    }

    /// Render a tree; every format ends with a newline.
    pub fn render(&self, tree: &ExprArena, format: OutputFormat) -> String {
        match format {
            OutputFormat::Dump => tree.dump(),
            OutputFormat::Tree => tree.to_tree_string().to_string(),
            OutputFormat::Infix => format!("{}\n", tree.to_infix()),
        }
    }

    /// Resolve a dotted child path (`""` is the root).
    pub fn resolve(&self, tree: &ExprArena, path: &str) -> ApplicationResult<NodeId> {
        let positions = parse_node_path(path)?;
        tree.node_at_path(&positions)
            .ok_or_else(|| DomainError::InvalidPath(path.to_string()).into())
    }

    fn movable(&self, tree: &ExprArena, path: &str) -> ApplicationResult<NodeId> {
        let search = self.resolve(tree, path)?;
        if tree.root() == Some(search) {
            return Err(DragError::RootNotMovable.into());
        }
        Ok(search)
    }

    /// Every placement of the node at `path`, in slot order.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn placements(&self, tree: &ExprArena, path: &str) -> ApplicationResult<Vec<Candidate>> {
        let search = self.movable(tree, path)?;
        let candidates: Vec<Candidate> = build_placements(tree, search)
            .into_iter()
            .enumerate()
            .map(|(index, placement)| Candidate {
                slot: placement.slot().unwrap_or(index),
                ghost_path: placement
                    .tree()
                    .path_of(placement.ghost())
                    .unwrap_or_default(),
                placement,
            })
            .collect();
        debug!(count = candidates.len(), "placements for {:?}", path);
        Ok(candidates)
    }

    /// Move the node at `path` to slot `to` among its siblings.
    ///
    /// The relocated node stays ghost-marked in the returned placement.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn relocate(&self, tree: &ExprArena, path: &str, to: usize) -> ApplicationResult<Placement> {
        let search = self.movable(tree, path)?;
        let root = tree
            .root()
            .ok_or_else(|| DomainError::InvalidPath(path.to_string()))?;

        deep_copy_with_placement(tree, root, to, search).map_err(|e| match e {
            PlacementError::NoMoreCombinations { index, .. } => {
                let siblings = tree
                    .parent(search)
                    .map(|parent| tree.children(parent).len())
                    .unwrap_or(0);
                ApplicationError::from(DomainError::SlotOutOfRange { index, siblings })
            }
        })
    }
}
