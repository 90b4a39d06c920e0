use std::io;
use std::path::PathBuf;

use thiserror::Error;
use toolbelt_provider_api::CapabilityKind;

/// Reasons a provider directory could not be turned into a provider.
///
/// Load errors never abort discovery: the offending directory is logged and
/// skipped, and the error is reported alongside the providers that did load.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The discovery root itself is missing or unreadable.
    #[error("cannot read provider root {}: {source}", path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An entry below the root could not be enumerated.
    #[error("cannot enumerate providers: {0}")]
    Walk(#[from] ignore::Error),

    /// A manifest or definition file exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A remote-content manifest is not valid JSON of the expected shape.
    #[error("malformed manifest {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A provider definition is not valid TOML of the expected shape.
    #[error("malformed provider definition {}: {source}", path.display())]
    Definition {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The definition does not name any entry point for its capability.
    #[error("provider '{provider}' ({kind}) does not declare an entry point")]
    MissingEntry {
        provider: String,
        kind: CapabilityKind,
    },

    /// The definition names an entry point nobody exported.
    #[error("provider '{provider}' requires {kind} symbol '{symbol}', which is not exported")]
    MissingSymbol {
        provider: String,
        kind: CapabilityKind,
        symbol: String,
    },
}
