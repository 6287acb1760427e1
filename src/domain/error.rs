//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Raised by the top-level parser entry point only.
///
/// Grammar rules signal "no match" with `None`; this error exists once the
/// whole input has been tried and nothing matched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("cannot parse expression: {input:?}")]
    Invalid { input: String },

    #[error("expression too long: {len} characters (max {max})")]
    TooLong { len: usize, max: usize },
}

impl ParseError {
    /// The offending text, when the error carries it.
    pub fn input(&self) -> Option<&str> {
        match self {
            ParseError::Invalid { input } => Some(input),
            ParseError::TooLong { .. } => None,
        }
    }
}

/// Sentinel ending a placement enumeration.
///
/// Not a user-facing error: `Placements` consumes it and stops.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    #[error("no more combinations: slot {index} is outside {siblings} sibling slots")]
    NoMoreCombinations { index: usize, siblings: usize },
}

/// Misuse of a `DragSession`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragError {
    #[error("the root expression cannot be moved")]
    RootNotMovable,

    #[error("no drag in progress")]
    NotDragging,

    #[error("a drag is already in progress")]
    DragInProgress,

    #[error("node does not belong to this expression")]
    UnknownNode,

    #[error("expression tree is empty")]
    EmptyTree,
}

/// Domain errors represent violations of expression-tree rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Drag(#[from] DragError),

    #[error("invalid node path: {0:?}")]
    InvalidPath(String),

    #[error("slot {index} out of range: node has {siblings} sibling slots")]
    SlotOutOfRange { index: usize, siblings: usize },
}
