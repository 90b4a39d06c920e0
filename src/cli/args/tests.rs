use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches, Parser};

use super::{CliArgs, CommandArg, OutputFormat};

#[test]
fn command_definition_is_consistent() {
	CliArgs::command().debug_assert();
}

#[test]
fn parse_cli_accepts_default_arguments() {
	let command = CliArgs::command();
	let mut matches = command.get_matches_from(vec!["toolbelt"]);
	let parsed = CliArgs::from_arg_matches_mut(&mut matches).expect("parses");
	assert_eq!(parsed.output, OutputFormat::Plain);
	assert_eq!(parsed.selected_command(), CommandArg::List);
	assert_eq!(parsed.verbose, 0);
}

#[test]
fn global_flags_follow_subcommands() {
	let parsed = CliArgs::parse_from([
		"toolbelt",
		"query",
		"0xff",
		"--format",
		"json",
		"-vv",
		"--providers",
		"/srv/providers",
	]);
	assert_eq!(
		parsed.selected_command(),
		CommandArg::Query {
			text: "0xff".to_string()
		}
	);
	assert_eq!(parsed.output, OutputFormat::Json);
	assert_eq!(parsed.verbose, 2);
	assert_eq!(parsed.providers, Some(PathBuf::from("/srv/providers")));
}

#[test]
fn config_files_accumulate() {
	let parsed = CliArgs::parse_from(["toolbelt", "-c", "a.toml", "--config", "b.toml", "list"]);
	assert_eq!(
		parsed.config,
		vec![PathBuf::from("a.toml"), PathBuf::from("b.toml")]
	);
}
