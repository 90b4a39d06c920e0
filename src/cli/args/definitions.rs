use std::path::PathBuf;

use clap::{ArgAction, ColorChoice, Parser, Subcommand};

use super::options::OutputFormat;
use super::styles::{cli_styles, long_version};

/// Command-line arguments accepted by the `toolbelt` binary.
#[derive(Parser, Debug)]
#[command(
    name = "toolbelt",
    version,
    long_version = long_version(),
    about = "Keyboard-driven launcher for pluggable tools, actions and live search sources",
    color = ColorChoice::Auto,
    styles = cli_styles()
)]
pub(crate) struct CliArgs {
    #[command(subcommand)]
    pub(crate) command: Option<CommandArg>,
    #[arg(
        short,
        long = "config",
        value_name = "FILE",
        env = "TOOLBELT_CONFIG",
        action = ArgAction::Append,
        global = true,
        help = "Additional configuration file to merge (default: none)"
    )]
    pub(crate) config: Vec<PathBuf>,
    #[arg(
        short = 'n',
        long = "no-config",
        global = true,
        help = "Skip loading default configuration files (default: disabled)"
    )]
    pub(crate) no_config: bool,
    #[arg(
        short = 'p',
        long,
        value_name = "DIR",
        global = true,
        help = "Override the provider discovery root (default: <data dir>/providers)"
    )]
    pub(crate) providers: Option<PathBuf>,
    #[arg(
        long = "debounce-ms",
        value_name = "MS",
        global = true,
        help = "Quiet period before a query is searched (default: 300)"
    )]
    pub(crate) debounce_ms: Option<u64>,
    #[arg(
        long = "max-results",
        value_name = "N",
        global = true,
        help = "Maximum number of locally ranked providers (default: 50)"
    )]
    pub(crate) max_results: Option<usize>,
    #[arg(
        short = 'f',
        long = "format",
        value_enum,
        default_value_t = OutputFormat::Plain,
        global = true,
        help = "Output format for listings and results"
    )]
    pub(crate) output: OutputFormat,
    #[arg(
        long = "print-config",
        global = true,
        help = "Print the effective configuration before running (default: disabled)"
    )]
    pub(crate) print_config: bool,
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase log verbosity; repeat for more detail (TOOLBELT_LOG overrides)"
    )]
    pub(crate) verbose: u8,
}

impl CliArgs {
    /// Subcommand to run; listing providers when none was given.
    pub(crate) fn selected_command(&self) -> CommandArg {
        self.command.clone().unwrap_or(CommandArg::List)
    }
}

/// Operations the binary can perform.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum CommandArg {
    /// List every discovered provider.
    List,
    /// Run one debounced search round and print the results.
    Query {
        /// Text to search for.
        #[arg(value_name = "TEXT")]
        text: String,
    },
    /// Activate a tool, action or remote page by its display name.
    Open {
        /// Provider name, matched without regard to ASCII case.
        #[arg(value_name = "NAME")]
        name: String,
    },
}
