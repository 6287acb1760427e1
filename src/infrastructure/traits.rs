//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing the CLI
//! to be tested with mock implementations.

use std::io::{self, Read};
use std::path::Path;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;
}

/// Source of expression text when none is given on the command line.
pub trait InputSource: Send + Sync {
    /// Read all remaining input.
    fn read_all(&self) -> io::Result<String>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Standard input.
#[derive(Debug, Default)]
pub struct Stdin;

impl InputSource for Stdin {
    fn read_all(&self) -> io::Result<String> {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    }
}
