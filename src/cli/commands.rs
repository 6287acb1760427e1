//! Command dispatch: one function per subcommand

use std::io;

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands, InputArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, OutputFormat};
use crate::domain::{format_node_path, ExprArena};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Parse { input, format }) => cmd_parse(container, input, *format),
        Some(Commands::Check { input }) => cmd_check(container, input),
        Some(Commands::Placements {
            input,
            node,
            format,
        }) => cmd_placements(container, input, node, *format),
        Some(Commands::Move {
            input,
            node,
            to,
            format,
        }) => cmd_move(container, input, node, *to, *format),
        Some(Commands::Config { command }) => cmd_config(container, cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "exprtree", &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `exprtree --help`".to_string(),
        )),
    }
}

fn load_tree(container: &ServiceContainer, input: &InputArgs) -> CliResult<ExprArena> {
    let text = container.read_expression(input.expr.as_deref(), input.file.as_deref())?;
    debug!("expression: {:?}", text.trim());
    Ok(container.expressions.parse(text.trim())?)
}

fn format_or_default(container: &ServiceContainer, format: Option<OutputFormat>) -> OutputFormat {
    format.unwrap_or(container.settings.output.format)
}

#[instrument(skip(container))]
fn cmd_parse(
    container: &ServiceContainer,
    input: &InputArgs,
    format: Option<OutputFormat>,
) -> CliResult<()> {
    let tree = load_tree(container, input)?;
    let format = format_or_default(container, format);
    output::raw(&container.expressions.render(&tree, format));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_check(container: &ServiceContainer, input: &InputArgs) -> CliResult<()> {
    let tree = load_tree(container, input)?;
    output::success(&format!("valid: {} ({} nodes)", tree.to_infix(), tree.len()));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_placements(
    container: &ServiceContainer,
    input: &InputArgs,
    node: &str,
    format: Option<OutputFormat>,
) -> CliResult<()> {
    let tree = load_tree(container, input)?;
    let format = format_or_default(container, format);
    let candidates = container.expressions.placements(&tree, node)?;

    output::header(&format!(
        "{} placements of node {:?} in {}",
        candidates.len(),
        node,
        tree.to_infix()
    ));
    for candidate in &candidates {
        output::action(
            &format!("slot {}", candidate.slot),
            &format!("node at {}", format_node_path(&candidate.ghost_path)),
        );
        output::raw(
            &container
                .expressions
                .render(candidate.placement.tree(), format),
        );
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_move(
    container: &ServiceContainer,
    input: &InputArgs,
    node: &str,
    to: usize,
    format: Option<OutputFormat>,
) -> CliResult<()> {
    let tree = load_tree(container, input)?;
    let format = format_or_default(container, format);
    let placement = container.expressions.relocate(&tree, node, to)?;
    let mut moved = placement.into_tree();
    moved.clear_ghost();
    output::raw(&container.expressions.render(&moved, format));
    Ok(())
}

fn cmd_config(container: &ServiceContainer, cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::header("Effective configuration");
            output::raw(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::action("global", "<unavailable>"),
            }
            let local_dir = match &cli.config_dir {
                Some(dir) => dir.clone(),
                None => std::env::current_dir().map_err(|e| InfraError::io("current directory", e))?,
            };
            output::action("local", &local_config_path(&local_dir).display());
            output::detail("environment overrides: EXPRTREE_PARSER__MEMOIZE, EXPRTREE_OUTPUT__FORMAT");
        }
    }
    Ok(())
}
