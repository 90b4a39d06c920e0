use anyhow::Result;
use serde_json::{Value, json};
use toolbelt::{Activation, DisplayedEntry, ProviderSummary, ResultBoard};
use unicode_width::UnicodeWidthStr;

use super::OutputFormat;

/// Print the discovered providers.
pub(crate) fn print_providers(providers: &[ProviderSummary], format: OutputFormat) -> Result<()> {
	match format {
		OutputFormat::Plain => print!("{}", format_providers_plain(providers)),
		OutputFormat::Json => println!("{}", serde_json::to_string_pretty(providers)?),
	}
	Ok(())
}

/// Print the entries of a settled result board.
pub(crate) fn print_board(board: &ResultBoard, format: OutputFormat) -> Result<()> {
	match format {
		OutputFormat::Plain => print!("{}", format_board_plain(board)),
		OutputFormat::Json => println!("{}", format_board_json(board)?),
	}
	Ok(())
}

/// Print what activating a provider produced.
pub(crate) fn print_activation(activation: &Activation, format: OutputFormat) -> Result<()> {
	match format {
		OutputFormat::Plain => match activation {
			Activation::View { title, .. } => println!("Opened {title}"),
			Activation::Executed { name } => println!("Ran {name}"),
			Activation::Remote { title, location } => {
				println!("Opened {title} at {}", location.display());
			}
			Activation::ResultExecuted {
				provider_name,
				title,
			} => println!("{provider_name}: {title}"),
		},
		OutputFormat::Json => println!(
			"{}",
			serde_json::to_string_pretty(&activation_json(activation))?
		),
	}
	Ok(())
}

/// Pad `text` with spaces to `width` display columns.
fn pad(text: &str, width: usize) -> String {
	let fill = width.saturating_sub(UnicodeWidthStr::width(text));
	format!("{text}{}", " ".repeat(fill))
}

fn format_providers_plain(providers: &[ProviderSummary]) -> String {
	if providers.is_empty() {
		return "No providers found\n".to_string();
	}

	let name_width = providers
		.iter()
		.map(|provider| UnicodeWidthStr::width(provider.name.as_str()))
		.max()
		.unwrap_or(0);
	let kind_width = providers
		.iter()
		.map(|provider| provider.kind.as_str().len())
		.max()
		.unwrap_or(0);

	let mut out = String::new();
	for provider in providers {
		let line = format!(
			"{}  {}  {}",
			pad(&provider.name, name_width),
			pad(provider.kind.as_str(), kind_width),
			provider.description
		);
		out.push_str(line.trim_end());
		out.push('\n');
	}
	out
}

fn format_board_plain(board: &ResultBoard) -> String {
	if board.entries().is_empty() {
		return format!("No results for '{}'\n", board.query());
	}

	let mut out = String::new();
	for entry in board.entries() {
		let line = match entry {
			DisplayedEntry::Provider { title, score, .. } => format!("{score:.2}  {title}"),
			DisplayedEntry::Result { result, .. } => {
				format!("{}  {}  {}", result.source_name(), result.title(), result.description())
			}
		};
		out.push_str(line.trim_end());
		out.push('\n');
	}
	out
}

fn entry_json(entry: &DisplayedEntry) -> Value {
	match entry {
		DisplayedEntry::Provider {
			id,
			title,
			description,
			score,
		} => json!({
			"type": "provider",
			"id": id,
			"title": title,
			"description": description,
			"score": score,
		}),
		DisplayedEntry::Result { provider, result } => json!({
			"type": "result",
			"provider": provider,
			"source": result.source_name(),
			"title": result.title(),
			"description": result.description(),
		}),
	}
}

/// Format the board as a JSON document.
pub(crate) fn format_board_json(board: &ResultBoard) -> Result<String> {
	let payload = json!({
		"round": board.round(),
		"query": board.query(),
		"complete": board.is_complete(),
		"entries": board.entries().iter().map(entry_json).collect::<Vec<_>>(),
	});
	Ok(serde_json::to_string_pretty(&payload)?)
}

fn activation_json(activation: &Activation) -> Value {
	match activation {
		Activation::View { title, .. } => json!({ "type": "view", "title": title }),
		Activation::Executed { name } => json!({ "type": "executed", "name": name }),
		Activation::Remote { title, location } => json!({
			"type": "remote",
			"title": title,
			"location": location,
		}),
		Activation::ResultExecuted {
			provider_name,
			title,
		} => json!({
			"type": "result-executed",
			"provider": provider_name,
			"title": title,
		}),
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use toolbelt::provider_api::{CapabilityKind, SearchResult};
	use toolbelt::ranking::RankingEngine;
	use toolbelt::{ProviderId, SearchEvent};

	use super::*;

	fn summary(id: usize, name: &str, kind: CapabilityKind, description: &str) -> ProviderSummary {
		ProviderSummary {
			id: ProviderId::new(id),
			name: name.to_string(),
			description: description.to_string(),
			kind,
		}
	}

	#[test]
	fn provider_table_aligns_wide_names() {
		let table = format_providers_plain(&[
			summary(0, "计算器", CapabilityKind::Presentable, "Calculator"),
			summary(1, "Paint", CapabilityKind::SearchSource, ""),
		]);
		let lines: Vec<&str> = table.lines().collect();
		assert_eq!(lines[0], "计算器  presentable    Calculator");
		assert_eq!(lines[1], "Paint   search-source");
	}

	#[test]
	fn empty_listing_says_so() {
		assert_eq!(format_providers_plain(&[]), "No providers found\n");
	}

	#[test]
	fn board_json_includes_result_origin() {
		let mut board = ResultBoard::new(Arc::new(RankingEngine::new()), 10);
		board.apply(SearchEvent::RoundStarted {
			round: 1,
			query: "foo".to_string(),
		});
		board.apply(SearchEvent::ProviderResults {
			round: 1,
			provider: ProviderId::new(2),
			provider_name: "Echo".to_string(),
			results: vec![SearchResult::new("foo-result", "", "Echo")],
		});

		let json = format_board_json(&board).expect("json");
		let value: Value = serde_json::from_str(&json).expect("parse");
		assert_eq!(value["query"], "foo");
		assert_eq!(value["entries"][0]["type"], "result");
		assert_eq!(value["entries"][0]["provider"], 2);
		assert_eq!(value["entries"][0]["source"], "Echo");
	}
}
