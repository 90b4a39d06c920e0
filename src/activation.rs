//! Routing a chosen entry to the provider that owns it.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use toolbelt_provider_api::{Capability, ProviderError, SearchResult, View};
use tracing::{debug, info};

use crate::orchestrator::panic_message;
use crate::registry::{ProviderId, ProviderRegistry};

/// An entry the user picked from the result list.
#[derive(Debug, Clone)]
pub enum Selection {
    /// A provider from the local index.
    Provider(ProviderId),
    /// A result, tagged with the search source that produced it.
    Result {
        provider: ProviderId,
        result: SearchResult,
    },
}

/// What activating a [`Selection`] produced.
pub enum Activation {
    /// A fresh view instance under a title unique among open views.
    View { title: String, view: View },
    /// An action ran to completion.
    Executed { name: String },
    /// Remote content ready to be rendered from `location`.
    Remote { title: String, location: PathBuf },
    /// A search result was handed back to its source.
    ResultExecuted { provider_name: String, title: String },
}

impl fmt::Debug for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::View { title, .. } => f
                .debug_struct("View")
                .field("title", title)
                .finish_non_exhaustive(),
            Self::Executed { name } => f.debug_struct("Executed").field("name", name).finish(),
            Self::Remote { title, location } => f
                .debug_struct("Remote")
                .field("title", title)
                .field("location", location)
                .finish(),
            Self::ResultExecuted {
                provider_name,
                title,
            } => f
                .debug_struct("ResultExecuted")
                .field("provider_name", provider_name)
                .field("title", title)
                .finish(),
        }
    }
}

/// Titles of the views that are currently open.
#[derive(Debug, Clone, Default)]
pub struct OpenInstances {
    titles: BTreeSet<String>,
}

impl OpenInstances {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a title for a new instance of `name`.
    ///
    /// The first instance keeps the bare name; later ones get the lowest
    /// free ordinal starting at 2, e.g. `Name (2)`.
    pub fn claim(&mut self, name: &str) -> String {
        let title = if self.titles.contains(name) {
            (2_usize..)
                .map(|ordinal| format!("{name} ({ordinal})"))
                .find(|candidate| !self.titles.contains(candidate))
                .unwrap_or_else(|| name.to_string())
        } else {
            name.to_string()
        };
        self.titles.insert(title.clone());
        title
    }

    /// Release `title`. Returns `false` if it was not open.
    pub fn close(&mut self, title: &str) -> bool {
        self.titles.remove(title)
    }

    #[must_use]
    pub fn is_open(&self, title: &str) -> bool {
        self.titles.contains(title)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

/// Dispatches selections to providers according to their capability.
#[derive(Debug)]
pub struct Launcher {
    registry: Arc<ProviderRegistry>,
    open: OpenInstances,
}

impl Launcher {
    #[must_use]
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self {
            registry,
            open: OpenInstances::new(),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn open_instances(&self) -> &OpenInstances {
        &self.open
    }

    /// Forget an open view so its title can be reused.
    pub fn close(&mut self, title: &str) -> bool {
        self.open.close(title)
    }

    /// Activate `selection`. Provider code runs on the blocking pool.
    pub async fn activate(&mut self, selection: Selection) -> Result<Activation, ProviderError> {
        match selection {
            Selection::Provider(id) => self.activate_provider(id).await,
            Selection::Result { provider, result } => self.execute_result(provider, result).await,
        }
    }

    async fn activate_provider(&mut self, id: ProviderId) -> Result<Activation, ProviderError> {
        let provider = self
            .registry
            .get(id)
            .ok_or(ProviderError::UnknownProvider(id.index()))?;
        let name = provider.name().to_string();

        match provider.capability() {
            Capability::Presentable(presentable) => {
                let presentable = Arc::clone(presentable);
                let view = run_blocking(&name, move || presentable.create_view()).await?;
                let title = self.open.claim(&name);
                debug!(provider = %name, title = %title, "opened view");
                Ok(Activation::View { title, view })
            }
            Capability::Actionable(action) => {
                let action = Arc::clone(action);
                run_blocking(&name, move || action.execute()).await?;
                info!(provider = %name, "action executed");
                Ok(Activation::Executed { name })
            }
            Capability::RemoteView(remote) => {
                let location = remote.entry_location();
                if !location.exists() {
                    return Err(ProviderError::EntryNotFound { path: location });
                }
                let title = self.open.claim(&name);
                debug!(provider = %name, location = %location.display(), "opened remote content");
                Ok(Activation::Remote { title, location })
            }
            Capability::SearchSource(_) => Err(ProviderError::unsupported(
                name,
                provider.kind(),
                "activation",
            )),
        }
    }

    async fn execute_result(
        &self,
        id: ProviderId,
        result: SearchResult,
    ) -> Result<Activation, ProviderError> {
        let provider = self
            .registry
            .get(id)
            .ok_or(ProviderError::UnknownProvider(id.index()))?;
        let name = provider.name().to_string();

        let Capability::SearchSource(source) = provider.capability() else {
            return Err(ProviderError::unsupported(
                name,
                provider.kind(),
                "result execution",
            ));
        };

        let source = Arc::clone(source);
        let title = result.title().to_string();
        run_blocking(&name, move || source.execute_result(&result)).await?;
        info!(provider = %name, result = %title, "result executed");
        Ok(Activation::ResultExecuted {
            provider_name: name,
            title,
        })
    }
}

async fn run_blocking<T, F>(provider: &str, call: F) -> Result<T, ProviderError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ProviderError> + Send + 'static,
{
    match tokio::task::spawn_blocking(call).await {
        Ok(outcome) => outcome,
        Err(err) => Err(ProviderError::Panicked {
            provider: provider.to_string(),
            message: panic_message(err),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tempfile::TempDir;
    use toolbelt_provider_api::{
        CapabilityKind, Provider, ProviderMetadata, RemoteView, SearchSource,
    };

    use super::*;

    #[derive(Default)]
    struct Recorder {
        executed: Mutex<Vec<String>>,
    }

    impl SearchSource for Recorder {
        fn search(&self, query: &str) -> Result<Vec<SearchResult>, ProviderError> {
            Ok(vec![
                SearchResult::new(query, "", "Recorder").with_payload(query.len()),
            ])
        }

        fn execute_result(&self, result: &SearchResult) -> Result<(), ProviderError> {
            let length = result
                .payload_as::<usize>()
                .ok_or_else(|| ProviderError::failed("foreign result"))?;
            self.executed
                .lock()
                .map_err(|_| ProviderError::failed("poisoned"))?
                .push(format!("{}:{length}", result.title()));
            Ok(())
        }
    }

    fn launcher(remote_dir: &std::path::Path, recorder: Arc<Recorder>) -> Launcher {
        let counter = Arc::new(AtomicUsize::new(0));
        let views = Arc::clone(&counter);
        let registry = ProviderRegistry::from_providers([
            Provider::new(
                ProviderMetadata::new("Paint", "Simple canvas"),
                Capability::presentable(move || {
                    let n = views.fetch_add(1, Ordering::SeqCst);
                    Ok::<View, ProviderError>(Box::new(n))
                }),
            ),
            Provider::new(
                ProviderMetadata::new("Recorder", ""),
                Capability::SearchSource(recorder),
            ),
            Provider::new(
                ProviderMetadata::new("Clear Trash", "Empty the bin"),
                Capability::actionable(|| Ok::<(), ProviderError>(())),
            ),
            Provider::new(
                ProviderMetadata::new("Docs", ""),
                Capability::RemoteView(RemoteView::new(remote_dir, "index.html")),
            ),
            Provider::new(
                ProviderMetadata::new("Crash", ""),
                Capability::actionable(|| -> Result<(), ProviderError> { panic!("boom") }),
            ),
        ]);
        Launcher::new(Arc::new(registry))
    }

    #[test]
    fn ordinals_fill_the_first_gap() {
        let mut open = OpenInstances::new();
        assert_eq!(open.claim("Paint"), "Paint");
        assert_eq!(open.claim("Paint"), "Paint (2)");
        assert_eq!(open.claim("Paint"), "Paint (3)");
        assert!(open.close("Paint (2)"));
        assert_eq!(open.claim("Paint"), "Paint (2)");
        assert!(open.close("Paint"));
        assert_eq!(open.claim("Paint"), "Paint");
        assert!(!open.close("Paint (9)"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn presentable_opens_independent_instances() {
        let dir = TempDir::new().expect("tempdir");
        let mut launcher = launcher(dir.path(), Arc::default());

        let Activation::View { title, view } = launcher
            .activate(Selection::Provider(ProviderId::new(0)))
            .await
            .expect("first view")
        else {
            panic!("expected a view");
        };
        assert_eq!(title, "Paint");
        assert_eq!(view.downcast_ref::<usize>(), Some(&0));

        let Activation::View { title, view } = launcher
            .activate(Selection::Provider(ProviderId::new(0)))
            .await
            .expect("second view")
        else {
            panic!("expected a view");
        };
        assert_eq!(title, "Paint (2)");
        assert_eq!(view.downcast_ref::<usize>(), Some(&1));
        assert_eq!(launcher.open_instances().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn actions_and_search_sources_route_by_capability() {
        let dir = TempDir::new().expect("tempdir");
        let mut launcher = launcher(dir.path(), Arc::default());

        let executed = launcher
            .activate(Selection::Provider(ProviderId::new(2)))
            .await
            .expect("action runs");
        assert!(matches!(executed, Activation::Executed { name } if name == "Clear Trash"));

        let err = launcher
            .activate(Selection::Provider(ProviderId::new(1)))
            .await
            .expect_err("search sources are not activatable");
        assert!(matches!(
            err,
            ProviderError::Unsupported {
                kind: CapabilityKind::SearchSource,
                ..
            }
        ));

        let err = launcher
            .activate(Selection::Provider(ProviderId::new(42)))
            .await
            .expect_err("unknown provider");
        assert!(matches!(err, ProviderError::UnknownProvider(42)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn results_return_to_their_source() {
        let dir = TempDir::new().expect("tempdir");
        let recorder = Arc::new(Recorder::default());
        let mut launcher = launcher(dir.path(), Arc::clone(&recorder));

        let result = recorder.search("foo").expect("search")[0].clone();
        let activation = launcher
            .activate(Selection::Result {
                provider: ProviderId::new(1),
                result: result.clone(),
            })
            .await
            .expect("result executes");
        assert!(matches!(
            activation,
            Activation::ResultExecuted { ref provider_name, ref title }
                if provider_name == "Recorder" && title == "foo"
        ));
        assert_eq!(
            *recorder.executed.lock().expect("lock"),
            vec!["foo:3".to_string()]
        );

        let err = launcher
            .activate(Selection::Result {
                provider: ProviderId::new(2),
                result,
            })
            .await
            .expect_err("actions do not take results");
        assert!(matches!(err, ProviderError::Unsupported { .. }));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn remote_content_must_exist() {
        let dir = TempDir::new().expect("tempdir");
        let mut launcher = launcher(dir.path(), Arc::default());

        let err = launcher
            .activate(Selection::Provider(ProviderId::new(3)))
            .await
            .expect_err("entry is missing");
        assert!(matches!(err, ProviderError::EntryNotFound { .. }));
        assert!(launcher.open_instances().is_empty());

        fs::write(dir.path().join("index.html"), "<p>docs</p>").expect("write entry");
        let activation = launcher
            .activate(Selection::Provider(ProviderId::new(3)))
            .await
            .expect("entry exists");
        assert!(matches!(
            activation,
            Activation::Remote { ref title, ref location }
                if title == "Docs" && location == &dir.path().join("index.html")
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn panicking_provider_is_reported() {
        let dir = TempDir::new().expect("tempdir");
        let mut launcher = launcher(dir.path(), Arc::default());

        let err = launcher
            .activate(Selection::Provider(ProviderId::new(4)))
            .await
            .expect_err("panic surfaces as an error");
        match err {
            ProviderError::Panicked { provider, message } => {
                assert_eq!(provider, "Crash");
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
