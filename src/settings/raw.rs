use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use serde_json::Value;

use toolbelt::OrchestratorConfig;
use toolbelt::app_dirs;

use crate::cli::CliArgs;

use super::resolved::ResolvedConfig;

const DEFAULT_SHOW_WINDOW_HOTKEY: &str = "alt+space";

/// Mirror of the configuration file representation before CLI overrides and
/// validation are applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawConfig {
    search: SearchSection,
    providers: ProvidersSection,
    hotkeys: HotkeysSection,
    provider_settings: BTreeMap<String, Value>,
}

/// Query timing and sizing as read from disk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SearchSection {
    debounce_ms: Option<u64>,
    max_results: Option<usize>,
    shutdown_grace_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ProvidersSection {
    root: Option<PathBuf>,
}

/// Global shortcuts. The launcher stores them for the presentation layer
/// without interpreting them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct HotkeysSection {
    show_window: Option<String>,
}

impl RawConfig {
    /// Apply CLI overrides on top of the raw configuration values.
    pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
        if let Some(root) = cli.providers.clone() {
            self.providers.root = Some(root);
        }
        if let Some(value) = cli.debounce_ms {
            self.search.debounce_ms = Some(value);
        }
        if let Some(value) = cli.max_results {
            self.search.max_results = Some(value);
        }
    }

    /// Validate the raw values and fill in defaults.
    pub(super) fn resolve(self) -> Result<ResolvedConfig> {
        let defaults = OrchestratorConfig::default();

        let max_results = self.search.max_results.unwrap_or(defaults.max_results);
        ensure!(max_results > 0, "search.max_results must be at least 1");

        let search = OrchestratorConfig {
            debounce: self
                .search
                .debounce_ms
                .map_or(defaults.debounce, Duration::from_millis),
            max_results,
            shutdown_grace: self
                .search
                .shutdown_grace_ms
                .map_or(defaults.shutdown_grace, Duration::from_millis),
        };

        let mut providers_root = match self.providers.root {
            Some(root) => root,
            None => app_dirs::get_providers_dir()?,
        };
        if providers_root.is_relative() {
            providers_root = env::current_dir()
                .context("failed to resolve current directory for the provider root")?
                .join(providers_root);
        }

        let show_window_hotkey = self
            .hotkeys
            .show_window
            .map(|hotkey| hotkey.trim().to_string())
            .filter(|hotkey| !hotkey.is_empty())
            .unwrap_or_else(|| DEFAULT_SHOW_WINDOW_HOTKEY.to_string());

        Ok(ResolvedConfig {
            providers_root,
            search,
            show_window_hotkey,
            provider_settings: self.provider_settings,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::Parser;

    use super::*;

    fn parse(toml: &str) -> RawConfig {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .expect("config builds")
            .try_deserialize()
            .expect("config deserializes")
    }

    #[test]
    fn defaults_apply_to_an_empty_file() {
        let mut raw = parse("");
        raw.providers.root = Some(PathBuf::from("/opt/toolbelt/providers"));
        let resolved = raw.resolve().expect("resolves");

        assert_eq!(resolved.search, OrchestratorConfig::default());
        assert_eq!(resolved.show_window_hotkey, "alt+space");
        assert_eq!(resolved.providers_root, Path::new("/opt/toolbelt/providers"));
        assert!(resolved.provider_settings.is_empty());
    }

    #[test]
    fn file_values_are_honoured() {
        let resolved = parse(
            r#"
            [search]
            debounce_ms = 120
            max_results = 7
            shutdown_grace_ms = 250

            [providers]
            root = "/srv/providers"

            [hotkeys]
            show_window = "ctrl+space"

            [provider_settings.weather]
            city = "Hobart"
            "#,
        )
        .resolve()
        .expect("resolves");

        assert_eq!(resolved.search.debounce, Duration::from_millis(120));
        assert_eq!(resolved.search.max_results, 7);
        assert_eq!(resolved.search.shutdown_grace, Duration::from_millis(250));
        assert_eq!(resolved.providers_root, Path::new("/srv/providers"));
        assert_eq!(resolved.show_window_hotkey, "ctrl+space");
        assert_eq!(
            resolved.settings_for("weather").and_then(|table| table.get("city")),
            Some(&Value::String("Hobart".to_string()))
        );
    }

    #[test]
    fn cli_overrides_take_precedence() {
        let cli = CliArgs::parse_from([
            "toolbelt",
            "--providers",
            "/tmp/providers",
            "--debounce-ms",
            "10",
            "--max-results",
            "3",
        ]);
        let mut raw = parse("[search]\ndebounce_ms = 500\nmax_results = 40\n");
        raw.apply_cli_overrides(&cli);
        let resolved = raw.resolve().expect("resolves");

        assert_eq!(resolved.providers_root, Path::new("/tmp/providers"));
        assert_eq!(resolved.search.debounce, Duration::from_millis(10));
        assert_eq!(resolved.search.max_results, 3);
    }

    #[test]
    fn zero_max_results_is_rejected() {
        let mut raw = parse("[search]\nmax_results = 0\n");
        raw.providers.root = Some(PathBuf::from("/tmp"));
        assert!(raw.resolve().is_err());
    }
}
