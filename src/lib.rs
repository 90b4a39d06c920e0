//! Core crate for the `toolbelt` launcher.
//!
//! Providers are discovered from disk by the [`registry`], ranked locally by
//! `toolbelt-ranking`, queried live by the [`orchestrator`], and activated
//! through the [`activation`] router. The root module re-exports the pieces
//! a presentation layer needs so embedders do not have to dig through the
//! module hierarchy.

pub mod activation;
pub mod app_dirs;
pub mod builtin;
pub mod logging;
pub mod orchestrator;
pub mod registry;

pub use activation::{Activation, Launcher, OpenInstances, Selection};
pub use builtin::{BaseConverter, BaseConverterSettings, register_builtins};
pub use orchestrator::{
    DisplayedEntry, EventReceiver, LocalMatch, Orchestrator, OrchestratorClosed,
    OrchestratorConfig, ResultBoard, SearchEvent,
};
pub use registry::{
    LoadError, LoadOutcome, ProviderId, ProviderRegistry, ProviderSummary, SymbolTable,
};

pub use toolbelt_provider_api as provider_api;
pub use toolbelt_ranking as ranking;
