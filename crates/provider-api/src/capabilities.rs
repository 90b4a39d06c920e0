use std::any::Any;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::search::SearchResult;

/// Opaque view instance handed to the presentation layer.
pub type View = Box<dyn Any + Send>;

/// Closed set of things a provider can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapabilityKind {
    /// Produces a displayable view on demand.
    Presentable,
    /// Runs a fire-and-forget operation with no view.
    Actionable,
    /// Answers free-text queries and executes chosen results.
    SearchSource,
    /// Renders external content located by a path.
    RemoteView,
}

impl CapabilityKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Presentable => "presentable",
            Self::Actionable => "actionable",
            Self::SearchSource => "search-source",
            Self::RemoteView => "remote-view",
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider that opens a new, independent view every time it is asked.
pub trait Presentable: Send + Sync {
    fn create_view(&self) -> Result<View, ProviderError>;
}

/// A provider that performs a side effect and produces no view.
///
/// Failures are reported to the caller and never retried.
pub trait Actionable: Send + Sync {
    fn execute(&self) -> Result<(), ProviderError>;
}

/// A provider that answers queries itself instead of being indexed locally.
///
/// `search` is called from a worker thread, concurrently with every other
/// search source. Implementations own their timeouts: the launcher never
/// interrupts a call, it only stops listening once the query is superseded.
pub trait SearchSource: Send + Sync {
    /// Produce results for `query`, in the order they should be displayed.
    fn search(&self, query: &str) -> Result<Vec<SearchResult>, ProviderError>;

    /// Act on a result previously returned by [`search`](Self::search).
    fn execute_result(&self, result: &SearchResult) -> Result<(), ProviderError>;
}

impl<F> Presentable for F
where
    F: Fn() -> Result<View, ProviderError> + Send + Sync,
{
    fn create_view(&self) -> Result<View, ProviderError> {
        self()
    }
}

impl<F> Actionable for F
where
    F: Fn() -> Result<(), ProviderError> + Send + Sync,
{
    fn execute(&self) -> Result<(), ProviderError> {
        self()
    }
}

/// Content that lives on disk next to the provider's manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteView {
    base_dir: PathBuf,
    entry: String,
}

impl RemoteView {
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>, entry: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            entry: entry.into(),
        }
    }

    /// Directory the manifest was loaded from.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Entry path as declared by the manifest, relative to [`base_dir`](Self::base_dir).
    #[must_use]
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Full location of the content to render.
    ///
    /// The location is not checked here; callers must confirm it exists
    /// before opening a view.
    #[must_use]
    pub fn entry_location(&self) -> PathBuf {
        self.base_dir.join(&self.entry)
    }
}

/// The single capability a provider exposes, carrying its entry points.
#[derive(Clone)]
pub enum Capability {
    Presentable(Arc<dyn Presentable>),
    Actionable(Arc<dyn Actionable>),
    SearchSource(Arc<dyn SearchSource>),
    RemoteView(RemoteView),
}

impl Capability {
    /// Convenience constructor for a presentable capability.
    pub fn presentable<P>(provider: P) -> Self
    where
        P: Presentable + 'static,
    {
        Self::Presentable(Arc::new(provider))
    }

    /// Convenience constructor for an actionable capability.
    pub fn actionable<A>(provider: A) -> Self
    where
        A: Actionable + 'static,
    {
        Self::Actionable(Arc::new(provider))
    }

    /// Convenience constructor for a search source capability.
    pub fn search_source<S>(provider: S) -> Self
    where
        S: SearchSource + 'static,
    {
        Self::SearchSource(Arc::new(provider))
    }

    #[must_use]
    pub fn kind(&self) -> CapabilityKind {
        match self {
            Self::Presentable(_) => CapabilityKind::Presentable,
            Self::Actionable(_) => CapabilityKind::Actionable,
            Self::SearchSource(_) => CapabilityKind::SearchSource,
            Self::RemoteView(_) => CapabilityKind::RemoteView,
        }
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoteView(view) => f.debug_tuple("RemoteView").field(view).finish(),
            other => f.debug_tuple("Capability").field(&other.kind()).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_in_kebab_case() {
        let json = serde_json::to_string(&CapabilityKind::SearchSource).expect("serialize");
        assert_eq!(json, "\"search-source\"");
        assert_eq!(CapabilityKind::RemoteView.to_string(), "remote-view");
    }

    #[test]
    fn closures_act_as_entry_points() {
        let action = Capability::actionable(|| Ok::<(), ProviderError>(()));
        assert_eq!(action.kind(), CapabilityKind::Actionable);

        let view = Capability::presentable(|| Ok::<View, ProviderError>(Box::new(7_u32)));
        let Capability::Presentable(presentable) = view else {
            panic!("expected a presentable capability");
        };
        let first = presentable.create_view().expect("first view");
        let second = presentable.create_view().expect("second view");
        assert_eq!(first.downcast_ref::<u32>(), Some(&7));
        assert_eq!(second.downcast_ref::<u32>(), Some(&7));
    }

    #[test]
    fn remote_entry_is_resolved_against_base_dir() {
        let remote = RemoteView::new("/opt/providers/docs", "index.html");
        assert_eq!(
            remote.entry_location(),
            PathBuf::from("/opt/providers/docs/index.html")
        );
    }
}
