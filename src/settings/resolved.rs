use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_json::Value;
use toolbelt::OrchestratorConfig;

/// Application-ready configuration derived from user input, config files and
/// sensible defaults.
#[derive(Debug)]
pub struct ResolvedConfig {
    pub providers_root: PathBuf,
    pub search: OrchestratorConfig,
    pub show_window_hotkey: String,
    /// Opaque per-provider tables keyed by provider name.
    pub provider_settings: BTreeMap<String, Value>,
}

impl ResolvedConfig {
    /// Settings table for the provider called `name`, if any.
    #[must_use]
    pub fn settings_for(&self, name: &str) -> Option<&Value> {
        self.provider_settings.get(name)
    }

    /// Print a human readable summary of the effective configuration.
    pub fn print_summary(&self) {
        println!("Effective configuration:");
        println!("  Providers root: {}", self.providers_root.display());
        println!("  Debounce: {} ms", self.search.debounce.as_millis());
        println!("  Max results: {}", self.search.max_results);
        println!(
            "  Shutdown grace: {} ms",
            self.search.shutdown_grace.as_millis()
        );
        println!("  Show window hotkey: {}", self.show_window_hotkey);
        if self.provider_settings.is_empty() {
            println!("  Provider settings: (none)");
        } else {
            let names: Vec<&str> = self.provider_settings.keys().map(String::as_str).collect();
            println!("  Provider settings: {}", names.join(", "));
        }
    }
}
