//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/exprtree/exprtree.toml`
//! 3. Local config: `<dir>/.exprtree.toml` (current directory unless given)
//! 4. Environment variables: `EXPRTREE_*` prefix, `__` between sections

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{ParserOptions, DEFAULT_MAX_INPUT_LEN};

/// How trees are printed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-indented diagnostic dump
    #[default]
    Dump,
    /// Box-drawing tree
    Tree,
    /// Compact infix expression
    Infix,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Dump => "dump",
            OutputFormat::Tree => "tree",
            OutputFormat::Infix => "infix",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dump" => Ok(OutputFormat::Dump),
            "tree" => Ok(OutputFormat::Tree),
            "infix" => Ok(OutputFormat::Infix),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}

/// Parser tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ParserSettings {
    /// Skip spans already known not to match
    pub memoize: bool,
    /// Longest accepted input after whitespace removal, 0 = unlimited
    pub max_input_len: usize,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            memoize: true,
            max_input_len: DEFAULT_MAX_INPUT_LEN,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
}

/// Raw settings for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub parser: RawParserSettings,
    pub output: RawOutputSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawParserSettings {
    pub memoize: Option<bool>,
    pub max_input_len: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawOutputSettings {
    pub format: Option<OutputFormat>,
}

/// Unified configuration for exprtree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub parser: ParserSettings,
    pub output: OutputSettings,
}

/// Get the XDG config directory for exprtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "exprtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("exprtree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".exprtree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            parser: ParserSettings {
                memoize: overlay.parser.memoize.unwrap_or(self.parser.memoize),
                max_input_len: overlay
                    .parser
                    .max_input_len
                    .unwrap_or(self.parser.max_input_len),
            },
            output: OutputSettings {
                format: overlay.output.format.unwrap_or(self.output.format),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Directory holding `.exprtree.toml`; the current
    ///   directory when `None`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        // 3. Local config
        let local_dir = match local_dir {
            Some(dir) => Some(dir.to_path_buf()),
            None => std::env::current_dir().ok(),
        };
        if let Some(dir) = local_dir {
            let local_path = local_config_path(&dir);
            if local_path.exists() {
                debug!("loading local config {}", local_path.display());
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        // 4. Environment variables
        Self::apply_env_overrides(current)
    }

    /// Load a single file on top of the defaults, ignoring every other layer.
    pub fn load_file(path: &Path) -> Result<Self, ApplicationError> {
        Ok(Self::default().merge_with(&load_raw_settings(path)?))
    }

    /// Apply EXPRTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("EXPRTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_bool("parser.memoize") {
            settings.parser.memoize = val;
        }
        if let Ok(val) = config.get_int("parser.max_input_len") {
            settings.parser.max_input_len =
                usize::try_from(val).map_err(|_| ApplicationError::Config {
                    message: format!("parser.max_input_len must not be negative: {}", val),
                })?;
        }
        if let Ok(val) = config.get_string("output.format") {
            settings.output.format = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }

        Ok(settings)
    }

    /// Parser options derived from these settings.
    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            memoize: self.parser.memoize,
            max_input_len: match self.parser.max_input_len {
                0 => None,
                n => Some(n),
            },
        }
    }

    /// Serialize to TOML for display.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_converting_then_memoizes_with_limit() {
        let options = Settings::default().parser_options();
        assert!(options.memoize);
        assert_eq!(options.max_input_len, Some(DEFAULT_MAX_INPUT_LEN));
    }

    #[test]
    fn given_zero_limit_when_converting_then_unlimited() {
        let mut settings = Settings::default();
        settings.parser.max_input_len = 0;
        assert_eq!(settings.parser_options().max_input_len, None);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_keeps_unspecified_fields() {
        let overlay: RawSettings = toml::from_str("[output]\nformat = \"infix\"\n").unwrap();
        let merged = Settings::default().merge_with(&overlay);
        assert_eq!(merged.output.format, OutputFormat::Infix);
        assert_eq!(merged.parser, ParserSettings::default());
    }

    #[test]
    fn given_format_names_when_parsing_then_case_insensitive() {
        assert_eq!("TREE".parse::<OutputFormat>(), Ok(OutputFormat::Tree));
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn given_settings_when_serializing_then_round_trips_through_toml() {
        let settings = Settings::default();
        let text = settings.to_toml().unwrap();
        let back: Settings = toml::from_str(&text).unwrap();
        assert_eq!(back, settings);
    }
}
