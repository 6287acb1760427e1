//! Integration tests for Settings loading with layered merge semantics.
//!
//! These tests point the local layer at temp directories; a global config
//! or EXPRTREE_* variables on the test host would still apply.

use std::fs;

use tempfile::TempDir;

use exprtree::config::{local_config_path, OutputFormat, Settings};

#[test]
fn given_local_config_when_loading_file_then_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = local_config_path(dir.path());
    fs::write(
        &path,
        r#"
[parser]
memoize = false
max_input_len = 0

[output]
format = "tree"
"#,
    )
    .unwrap();

    let settings = Settings::load_file(&path).expect("load settings");

    assert!(!settings.parser.memoize);
    assert_eq!(settings.output.format, OutputFormat::Tree);
    assert_eq!(settings.parser_options().max_input_len, None);
}

#[test]
fn given_partial_config_when_loading_file_then_unspecified_keys_keep_defaults() {
    let dir = TempDir::new().unwrap();
    let path = local_config_path(dir.path());
    fs::write(&path, "[output]\nformat = \"infix\"\n").unwrap();

    let settings = Settings::load_file(&path).unwrap();

    assert_eq!(settings.output.format, OutputFormat::Infix);
    assert_eq!(settings.parser, Settings::default().parser);
}

#[test]
fn given_directory_when_loading_then_reads_dot_exprtree_toml() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".exprtree.toml"),
        "[parser]\nmax_input_len = 12\n",
    )
    .unwrap();

    let settings = Settings::load(Some(dir.path())).unwrap();
    assert_eq!(settings.parser.max_input_len, 12);
}

#[test]
fn given_invalid_toml_when_loading_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = local_config_path(dir.path());
    fs::write(&path, "[output]\nformat = \"xml\"\n").unwrap();

    let err = Settings::load_file(&path).unwrap_err();
    assert!(err.to_string().starts_with("config error:"));
}

#[test]
fn given_missing_file_when_loading_file_then_config_error() {
    let dir = TempDir::new().unwrap();
    let err = Settings::load_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(err.to_string().contains("absent.toml"));
}
