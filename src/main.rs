mod cli;
mod settings;
mod workflow;

use anyhow::Result;
use cli::{CliArgs, CommandArg, parse_cli, print_activation, print_board, print_providers};
use settings::ResolvedConfig;
use toolbelt::logging;
use workflow::LauncherWorkflow;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = parse_cli();
    logging::initialize(cli.verbose)?;

    let resolved = settings::load(&cli)?;

    if cli.print_config {
        resolved.print_summary();
    }

    run(&cli, &resolved).await
}

/// Execute the requested command and print output in the chosen format.
async fn run(cli: &CliArgs, settings: &ResolvedConfig) -> Result<()> {
    let workflow = LauncherWorkflow::from_config(settings);

    match cli.selected_command() {
        CommandArg::List => print_providers(&workflow.list(), cli.output),
        CommandArg::Query { text } => {
            let board = workflow.query(&text).await?;
            print_board(&board, cli.output)
        }
        CommandArg::Open { name } => {
            let activation = workflow.open(&name).await?;
            print_activation(&activation, cli.output)
        }
    }
}
