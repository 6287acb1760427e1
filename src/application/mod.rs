//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic for the CLI and other hosts.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
