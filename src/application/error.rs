//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::{DomainError, DragError, ParseError};

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("config error: {message}")]
    Config { message: String },
}

impl From<ParseError> for ApplicationError {
    fn from(e: ParseError) -> Self {
        ApplicationError::Domain(e.into())
    }
}

impl From<DragError> for ApplicationError {
    fn from(e: DragError) -> Self {
        ApplicationError::Domain(e.into())
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
