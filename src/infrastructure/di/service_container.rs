//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::application::services::ExpressionService;
use crate::config::Settings;
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::{FileSystem, InputSource, RealFileSystem, Stdin};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Fallback input when no expression is given
    pub input: Arc<dyn InputSource>,

    /// Expression parsing and placement
    pub expressions: ExpressionService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem), Arc::new(Stdin))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        input: Arc<dyn InputSource>,
    ) -> Self {
        let expressions = ExpressionService::from_settings(&settings);
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            input,
            expressions,
        }
    }

    /// Expression text from, in order: the argument, the file, the input source.
    pub fn read_expression(&self, expr: Option<&str>, file: Option<&Path>) -> InfraResult<String> {
        if let Some(expr) = expr {
            return Ok(expr.to_string());
        }
        if let Some(path) = file {
            debug!("reading expression from {}", path.display());
            if !self.fs.is_file(path) {
                return Err(InfraError::io(
                    format!("not a file: {}", path.display()),
                    std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
                ));
            }
            return self
                .fs
                .read_to_string(path)
                .map_err(|e| InfraError::io(format!("read {}", path.display()), e));
        }
        self.input
            .read_all()
            .map_err(|e| InfraError::io("read stdin", e))
    }
}
