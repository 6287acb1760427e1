//! Domain layer: expression trees and the algorithms over them
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod error;
pub mod flatten;
pub mod literal;
pub mod parser;
pub mod placement;
pub mod render;
pub mod session;

pub use arena::{ExprArena, ExprNode, NodeId, NodeKind, Operator, TreeId};
pub use error::{DomainError, DragError, ParseError, PlacementError};
pub use flatten::flatten;
pub use literal::{Literal, LiteralValue};
pub use parser::{ExpressionParser, ParserOptions, DEFAULT_MAX_INPUT_LEN};
pub use placement::{
    build_placements, closest_placement, deep_copy, deep_copy_with_placement, placements,
    Placement, Placements,
};
pub use render::TreeNodeConvert;
pub use session::DragSession;

/// Parse a dot-separated child path such as `1.0`; the empty string is the root.
pub fn parse_node_path(path: &str) -> Result<Vec<usize>, DomainError> {
    let path = path.trim();
    if path.is_empty() {
        return Ok(Vec::new());
    }
    path.split('.')
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .map_err(|_| DomainError::InvalidPath(path.to_string()))
        })
        .collect()
}

/// Render a child path back to its dotted form.
pub fn format_node_path(path: &[usize]) -> String {
    use itertools::Itertools;
    path.iter().join(".")
}
