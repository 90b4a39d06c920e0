use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use toolbelt_provider_api::CapabilityKind;

use super::error::LoadError;

/// File marking a directory as remote content.
pub const MANIFEST_FILE: &str = "manifest.json";

/// File marking a directory as a provider definition.
pub const DEFINITION_FILE: &str = "provider.toml";

pub const DEFAULT_NAME: &str = "unnamed";
pub const DEFAULT_ENTRY: &str = "index.html";

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

fn default_entry() -> String {
    DEFAULT_ENTRY.to_string()
}

/// Remote-content manifest as it is read from disk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(super) struct RemoteManifest {
    #[serde(default = "default_name")]
    pub(super) name: String,
    #[serde(default)]
    pub(super) description: String,
    #[serde(default = "default_entry")]
    pub(super) entry: String,
}

impl RemoteManifest {
    pub(super) fn load(path: &Path) -> Result<Self, LoadError> {
        let contents = read(path)?;
        serde_json::from_str(&contents).map_err(|source| LoadError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Provider definition unit: the capability tag plus exported entry points.
///
/// ```toml
/// kind = "action"
/// name = "Quick Shutdown"
/// description = "Power the machine off"
/// command = ["systemctl", "poweroff"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ProviderDefinition {
    pub(super) kind: Option<String>,
    pub(super) name: Option<String>,
    pub(super) description: Option<String>,
    pub(super) entry: Option<String>,
    pub(super) command: Option<Vec<String>>,
}

impl ProviderDefinition {
    pub(super) fn load(path: &Path) -> Result<Self, LoadError> {
        let contents = read(path)?;
        toml::from_str(&contents).map_err(|source| LoadError::Definition {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Capability the definition asks for, or `None` for an unrecognized tag.
    ///
    /// Definitions without a tag are presentable.
    pub(super) fn capability_kind(&self) -> Option<CapabilityKind> {
        let Some(tag) = self.kind.as_deref() else {
            return Some(CapabilityKind::Presentable);
        };

        match tag.trim().to_ascii_lowercase().as_str() {
            "presentable" | "widget" => Some(CapabilityKind::Presentable),
            "actionable" | "action" => Some(CapabilityKind::Actionable),
            "search" | "search-source" => Some(CapabilityKind::SearchSource),
            _ => None,
        }
    }

    pub(super) fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(default_name)
    }

    pub(super) fn description(&self) -> String {
        self.description.clone().unwrap_or_default()
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: PathBuf::from(path),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_fields_fall_back_to_defaults() {
        let manifest: RemoteManifest = serde_json::from_str("{}").expect("parse");
        assert_eq!(manifest.name, "unnamed");
        assert_eq!(manifest.description, "");
        assert_eq!(manifest.entry, "index.html");
    }

    #[test]
    fn manifest_reads_declared_fields() {
        let manifest: RemoteManifest = serde_json::from_str(
            r#"{"name": "Docs", "description": "Offline docs", "entry": "site/main.html"}"#,
        )
        .expect("parse");
        assert_eq!(manifest.name, "Docs");
        assert_eq!(manifest.entry, "site/main.html");
    }

    #[test]
    fn untagged_definitions_are_presentable() {
        let definition: ProviderDefinition = toml::from_str("name = \"Clock\"").expect("parse");
        assert_eq!(
            definition.capability_kind(),
            Some(CapabilityKind::Presentable)
        );
    }

    #[test]
    fn tags_accept_short_and_long_forms() {
        for (tag, kind) in [
            ("widget", CapabilityKind::Presentable),
            ("action", CapabilityKind::Actionable),
            ("Actionable", CapabilityKind::Actionable),
            ("search", CapabilityKind::SearchSource),
            ("search-source", CapabilityKind::SearchSource),
        ] {
            let definition = ProviderDefinition {
                kind: Some(tag.to_string()),
                ..ProviderDefinition::default()
            };
            assert_eq!(definition.capability_kind(), Some(kind), "tag {tag}");
        }
    }

    #[test]
    fn unknown_tags_are_not_recognized() {
        let definition = ProviderDefinition {
            kind: Some("web".to_string()),
            ..ProviderDefinition::default()
        };
        assert_eq!(definition.capability_kind(), None);
    }
}
