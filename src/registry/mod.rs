//! Provider discovery and lookup.
//!
//! Each immediate child directory of the provider root is one candidate.
//! A `manifest.json` turns it into remote content; a `provider.toml` binds
//! it to entry points exported through a [`SymbolTable`]. Anything else is
//! ignored. A broken provider never stops the others from loading.

mod command;
mod error;
mod manifest;
mod symbols;


use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use ignore::WalkBuilder;
use serde::Serialize;
use toolbelt_provider_api::{
    Capability, CapabilityKind, Provider, ProviderMetadata, RemoteView, SearchSource,
};
use toolbelt_ranking::{RankingEngine, SearchableItem};
use tracing::{debug, info, warn};

pub use command::CommandAction;
pub use error::LoadError;
pub use manifest::{DEFAULT_ENTRY, DEFAULT_NAME, DEFINITION_FILE, MANIFEST_FILE};
pub use symbols::SymbolTable;

use manifest::{ProviderDefinition, RemoteManifest};

/// Stable handle for a provider: its position in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ProviderId(usize);

impl ProviderId {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Flat description of a provider for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderSummary {
    pub id: ProviderId,
    pub name: String,
    pub description: String,
    pub kind: CapabilityKind,
}

/// Providers discovered by [`ProviderRegistry::load_all`] together with the
/// failures encountered along the way.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub registry: ProviderRegistry,
    pub errors: Vec<LoadError>,
}

/// Loaded providers in discovery order.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Provider>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register providers explicitly, bypassing discovery.
    #[must_use]
    pub fn from_providers<I>(providers: I) -> Self
    where
        I: IntoIterator<Item = Provider>,
    {
        Self {
            providers: providers.into_iter().collect(),
        }
    }

    /// Append a provider and return its identifier.
    pub fn push(&mut self, provider: Provider) -> ProviderId {
        let id = ProviderId(self.providers.len());
        self.providers.push(provider);
        id
    }

    /// Discover every provider below `root`.
    ///
    /// Children are visited in the order the filesystem enumerates them.
    /// Failures are logged and returned in [`LoadOutcome::errors`]; a
    /// missing root yields an empty registry and a single
    /// [`LoadError::Root`].
    pub fn load_all(root: &Path, symbols: &SymbolTable) -> LoadOutcome {
        let mut outcome = LoadOutcome::default();

        if let Err(source) = fs::read_dir(root) {
            warn!(root = %root.display(), error = %source, "provider root is unavailable");
            outcome.errors.push(LoadError::Root {
                path: root.to_path_buf(),
                source,
            });
            return outcome;
        }

        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(true)
            .max_depth(Some(1))
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable provider entry");
                    outcome.errors.push(LoadError::Walk(err));
                    continue;
                }
            };

            if entry.depth() == 0 || !entry.file_type().is_some_and(|kind| kind.is_dir()) {
                continue;
            }

            match load_dir(entry.path(), symbols) {
                Ok(Some(provider)) => {
                    debug!(
                        provider = provider.name(),
                        kind = %provider.kind(),
                        dir = %entry.path().display(),
                        "loaded provider"
                    );
                    outcome.registry.push(provider);
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(dir = %entry.path().display(), error = %err, "failed to load provider");
                    outcome.errors.push(err);
                }
            }
        }

        info!(
            root = %root.display(),
            loaded = outcome.registry.len(),
            failed = outcome.errors.len(),
            "provider discovery finished"
        );
        outcome
    }

    #[must_use]
    pub fn get(&self, id: ProviderId) -> Option<&Provider> {
        self.providers.get(id.0)
    }

    /// Iterate over providers with their identifiers, in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (ProviderId, &Provider)> {
        self.providers
            .iter()
            .enumerate()
            .map(|(index, provider)| (ProviderId(index), provider))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    #[must_use]
    pub fn list_providers(&self) -> Vec<ProviderSummary> {
        self.iter()
            .map(|(id, provider)| ProviderSummary {
                id,
                name: provider.name().to_string(),
                description: provider.description().to_string(),
                kind: provider.kind(),
            })
            .collect()
    }

    /// Providers that answer queries themselves.
    pub fn search_sources(&self) -> impl Iterator<Item = (ProviderId, &Arc<dyn SearchSource>)> {
        self.iter().filter_map(|(id, provider)| match provider.capability() {
            Capability::SearchSource(source) => Some((id, source)),
            _ => None,
        })
    }

    /// First provider whose display name equals `name`, ignoring ASCII case.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<(ProviderId, &Provider)> {
        self.iter()
            .find(|(_, provider)| provider.name().eq_ignore_ascii_case(name))
    }

    /// Build the local ranking index from every provider that is not a
    /// search source, in registry order.
    #[must_use]
    pub fn build_index(&self) -> RankingEngine<ProviderId> {
        self.iter()
            .filter(|(_, provider)| provider.kind() != CapabilityKind::SearchSource)
            .map(|(id, provider)| {
                SearchableItem::new(provider.name(), id).with_description(provider.description())
            })
            .collect()
    }
}

/// Turn one candidate directory into a provider.
///
/// `Ok(None)` means the directory is not a provider at all.
fn load_dir(dir: &Path, symbols: &SymbolTable) -> Result<Option<Provider>, LoadError> {
    let manifest_path = dir.join(MANIFEST_FILE);
    if manifest_path.is_file() {
        let manifest = RemoteManifest::load(&manifest_path)?;
        let metadata = ProviderMetadata::new(manifest.name, manifest.description);
        let remote = RemoteView::new(dir, manifest.entry);
        return Ok(Some(Provider::new(metadata, Capability::RemoteView(remote))));
    }

    let definition_path = dir.join(DEFINITION_FILE);
    if !definition_path.is_file() {
        debug!(dir = %dir.display(), "directory holds no provider, skipping");
        return Ok(None);
    }

    let definition = ProviderDefinition::load(&definition_path)?;
    let Some(kind) = definition.capability_kind() else {
        debug!(
            dir = %dir.display(),
            kind = definition.kind.as_deref().unwrap_or_default(),
            "unrecognized provider kind, skipping"
        );
        return Ok(None);
    };

    let name = definition.display_name();
    let capability = bind_capability(&definition, kind, &name, symbols)?;
    let metadata = ProviderMetadata::new(name, definition.description());
    Ok(Some(Provider::new(metadata, capability)))
}

fn bind_capability(
    definition: &ProviderDefinition,
    kind: CapabilityKind,
    name: &str,
    symbols: &SymbolTable,
) -> Result<Capability, LoadError> {
    if let Some(symbol) = definition.entry.as_deref() {
        return symbols
            .resolve(kind, symbol)
            .ok_or_else(|| LoadError::MissingSymbol {
                provider: name.to_string(),
                kind,
                symbol: symbol.to_string(),
            });
    }

    if kind == CapabilityKind::Actionable
        && let Some(action) = definition
            .command
            .as_deref()
            .and_then(CommandAction::from_argv)
    {
        return Ok(Capability::actionable(action));
    }

    Err(LoadError::MissingEntry {
        provider: name.to_string(),
        kind,
    })
}
