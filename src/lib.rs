//! exprtree: arithmetic expression trees
//!
//! Parses `+`, `*`, parentheses, integers and single-letter variables into
//! flattened n-ary trees, and enumerates the ways a node can be moved among
//! its siblings.
//!
//! Layers, innermost first:
//! - [`domain`]: tree arena, parser, flattening, copies and placements
//! - [`application`]: the expression service used by the CLI
//! - [`infrastructure`]: I/O traits and the service container
//! - [`cli`]: clap arguments, command dispatch, terminal output

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
