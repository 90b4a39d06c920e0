use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use toolbelt_provider_api::{Actionable, Capability, CapabilityKind, Presentable, SearchSource};

/// Named entry points that provider definitions bind to.
///
/// The host registers the implementations it ships; a `provider.toml`
/// then refers to one of them through its `entry` field. This is the only
/// way code reaches the registry, so an unknown name is a load error rather
/// than something resolved at call time.
#[derive(Clone, Default)]
pub struct SymbolTable {
    views: HashMap<String, Arc<dyn Presentable>>,
    actions: HashMap<String, Arc<dyn Actionable>>,
    searches: HashMap<String, Arc<dyn SearchSource>>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Export a view factory under `symbol`, replacing any previous export.
    pub fn register_view<P>(&mut self, symbol: impl Into<String>, view: P) -> &mut Self
    where
        P: Presentable + 'static,
    {
        self.views.insert(symbol.into(), Arc::new(view));
        self
    }

    /// Export an action under `symbol`, replacing any previous export.
    pub fn register_action<A>(&mut self, symbol: impl Into<String>, action: A) -> &mut Self
    where
        A: Actionable + 'static,
    {
        self.actions.insert(symbol.into(), Arc::new(action));
        self
    }

    /// Export a search source under `symbol`, replacing any previous export.
    pub fn register_search<S>(&mut self, symbol: impl Into<String>, source: S) -> &mut Self
    where
        S: SearchSource + 'static,
    {
        self.searches.insert(symbol.into(), Arc::new(source));
        self
    }

    /// Look up the entry point exported for `kind` under `symbol`.
    #[must_use]
    pub fn resolve(&self, kind: CapabilityKind, symbol: &str) -> Option<Capability> {
        match kind {
            CapabilityKind::Presentable => self
                .views
                .get(symbol)
                .map(|view| Capability::Presentable(Arc::clone(view))),
            CapabilityKind::Actionable => self
                .actions
                .get(symbol)
                .map(|action| Capability::Actionable(Arc::clone(action))),
            CapabilityKind::SearchSource => self
                .searches
                .get(symbol)
                .map(|source| Capability::SearchSource(Arc::clone(source))),
            CapabilityKind::RemoteView => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.views.len() + self.actions.len() + self.searches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolTable")
            .field("views", &self.views.keys().collect::<Vec<_>>())
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .field("searches", &self.searches.keys().collect::<Vec<_>>())
            .finish()
    }
}
