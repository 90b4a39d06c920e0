//! Shared provider interfaces and data types for `toolbelt`.
//!
//! Every provider exposes a [`ProviderMetadata`] record and exactly one
//! [`Capability`]. The capability decides which operations the launcher may
//! invoke, so the host never has to probe providers at runtime.

pub mod capabilities;
pub mod error;
pub mod metadata;
pub mod provider;
pub mod search;

pub use capabilities::{
    Actionable, Capability, CapabilityKind, Presentable, RemoteView, SearchSource, View,
};
pub use error::ProviderError;
pub use metadata::ProviderMetadata;
pub use provider::Provider;
pub use search::{Payload, SearchResult};
