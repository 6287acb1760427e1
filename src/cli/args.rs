//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

use crate::config::OutputFormat;

/// Parse arithmetic expressions into trees and rearrange their terms
#[derive(Parser, Debug)]
#[command(name = "exprtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Disable the parser's failure memo
    #[arg(long, global = true)]
    pub no_memo: bool,

    /// Directory holding .exprtree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where the expression text comes from.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Expression text (stdin when neither this nor --file is given)
    pub expr: Option<String>,

    /// Read the expression from a file
    #[arg(short, long, value_hint = ValueHint::FilePath, conflicts_with = "expr")]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse and print the expression tree
    Parse {
        #[command(flatten)]
        input: InputArgs,

        /// Output format (default from config)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Validate an expression
    Check {
        #[command(flatten)]
        input: InputArgs,
    },

    /// List every placement of a node among its siblings
    Placements {
        #[command(flatten)]
        input: InputArgs,

        /// Dotted child path of the node, e.g. 1.0
        #[arg(short, long)]
        node: String,

        /// Output format (default from config)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Move a node to another slot among its siblings
    Move {
        #[command(flatten)]
        input: InputArgs,

        /// Dotted child path of the node, e.g. 1.0
        #[arg(short, long)]
        node: String,

        /// Target sibling slot
        #[arg(short, long)]
        to: usize,

        /// Output format (default from config)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,

    /// Show config file locations
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn given_cli_definition_when_asserting_then_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_move_args_when_parsing_then_fields_are_set() {
        let cli = Cli::try_parse_from([
            "exprtree", "-dd", "move", "a+b+c", "--node", "2", "--to", "0", "--format", "infix",
        ])
        .unwrap();
        assert_eq!(cli.debug, 2);
        match cli.command {
            Some(Commands::Move {
                input,
                node,
                to,
                format,
            }) => {
                assert_eq!(input.expr.as_deref(), Some("a+b+c"));
                assert_eq!(node, "2");
                assert_eq!(to, 0);
                assert_eq!(format, Some(OutputFormat::Infix));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn given_expr_and_file_when_parsing_then_conflict() {
        let result = Cli::try_parse_from(["exprtree", "parse", "1+2", "--file", "x.txt"]);
        assert!(result.is_err());
    }
}
