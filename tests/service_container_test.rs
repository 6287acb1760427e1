//! Integration tests for the service container with mocked I/O.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use exprtree::application::ApplicationError;
use exprtree::cli::CliError;
use exprtree::config::{OutputFormat, Settings};
use exprtree::domain::{DomainError, ParseError};
use exprtree::exitcode;
use exprtree::infrastructure::di::ServiceContainer;
use exprtree::infrastructure::traits::{FileSystem, InputSource};
use exprtree::infrastructure::InfraError;

#[derive(Default)]
struct MockFileSystem {
    files: HashMap<PathBuf, String>,
}

impl MockFileSystem {
    fn with_file(path: &str, content: &str) -> Self {
        let mut files = HashMap::new();
        files.insert(PathBuf::from(path), content.to_string());
        Self { files }
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "mock: no such file"))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }
}

struct MockInput(&'static str);

impl InputSource for MockInput {
    fn read_all(&self) -> io::Result<String> {
        Ok(self.0.to_string())
    }
}

fn container(fs: MockFileSystem, input: &'static str) -> ServiceContainer {
    ServiceContainer::with_deps(Settings::default(), Arc::new(fs), Arc::new(MockInput(input)))
}

#[test]
fn given_argument_when_reading_expression_then_argument_wins() {
    let c = container(MockFileSystem::with_file("e.txt", "1+1"), "2+2");
    let text = c
        .read_expression(Some("3+3"), Some(Path::new("e.txt")))
        .unwrap();
    assert_eq!(text, "3+3");
}

#[test]
fn given_file_when_reading_expression_then_reads_file() {
    let c = container(MockFileSystem::with_file("e.txt", "x*y\n"), "2+2");
    let text = c.read_expression(None, Some(Path::new("e.txt"))).unwrap();
    assert_eq!(text, "x*y\n");
}

#[test]
fn given_nothing_when_reading_expression_then_falls_back_to_input() {
    let c = container(MockFileSystem::default(), "a+b\n");
    assert_eq!(c.read_expression(None, None).unwrap(), "a+b\n");
}

#[test]
fn given_missing_file_when_reading_expression_then_io_error_maps_to_ioerr() {
    let c = container(MockFileSystem::default(), "");
    let err = c
        .read_expression(None, Some(Path::new("missing.txt")))
        .unwrap_err();
    assert!(matches!(err, InfraError::Io { .. }));
    assert_eq!(CliError::from(err).exit_code(), exitcode::IOERR);
}

#[test]
fn given_container_when_parsing_and_relocating_then_services_are_wired() {
    let c = container(MockFileSystem::default(), "2*x+3*y+4*z+(7+6*z)");
    let text = c.read_expression(None, None).unwrap();
    let tree = c.expressions.parse(&text).unwrap();

    let candidates = c.expressions.placements(&tree, "3").unwrap();
    assert_eq!(candidates.len(), 4);
    assert_eq!(candidates[0].ghost_path, vec![0]);
    assert_eq!(
        c.expressions.render(candidates[0].placement.tree(), OutputFormat::Infix),
        "(7+6*z)+2*x+3*y+4*z\n"
    );
}

#[test]
fn given_bad_inputs_when_using_service_then_errors_map_to_exit_codes() {
    let c = container(MockFileSystem::default(), "");
    let err = c.expressions.parse("1+2+").unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::Parse(ParseError::Invalid { .. }))
    ));
    assert_eq!(CliError::from(err).exit_code(), exitcode::DATAERR);

    let tree = c.expressions.parse("a+b").unwrap();
    let err = c.expressions.resolve(&tree, "7").unwrap_err();
    assert_eq!(CliError::from(err).exit_code(), exitcode::USAGE);
}

#[test]
fn given_memo_disabled_in_settings_when_building_container_then_parser_follows() {
    let mut settings = Settings::default();
    settings.parser.memoize = false;
    let c = ServiceContainer::with_deps(
        settings,
        Arc::new(MockFileSystem::default()),
        Arc::new(MockInput("")),
    );
    assert!(!c.expressions.parser().options().memoize);
}
