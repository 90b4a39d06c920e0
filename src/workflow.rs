use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use toolbelt::ranking::RankingEngine;
use toolbelt::{
    Activation, Launcher, Orchestrator, OrchestratorConfig, ProviderId, ProviderRegistry,
    ProviderSummary, ResultBoard, SearchEvent, Selection, SymbolTable, register_builtins,
};
use tracing::debug;

use crate::settings::ResolvedConfig;

/// Coordinates discovery, headless search rounds and activation for the CLI.
pub(crate) struct LauncherWorkflow {
    registry: Arc<ProviderRegistry>,
    index: Arc<RankingEngine<ProviderId>>,
    search: OrchestratorConfig,
}

impl LauncherWorkflow {
    /// Discover providers under the configured root, binding definitions to
    /// the built-in entry points configured from their settings tables.
    pub(crate) fn from_config(config: &ResolvedConfig) -> Self {
        let mut symbols = SymbolTable::new();
        register_builtins(&mut symbols, |name| config.settings_for(name));

        let outcome = ProviderRegistry::load_all(&config.providers_root, &symbols);
        let registry = Arc::new(outcome.registry);
        let index = Arc::new(registry.build_index());
        Self {
            registry,
            index,
            search: config.search,
        }
    }

    pub(crate) fn list(&self) -> Vec<ProviderSummary> {
        self.registry.list_providers()
    }

    /// Run a single search round for `text` and return the settled board.
    pub(crate) async fn query(&self, text: &str) -> Result<ResultBoard> {
        let (orchestrator, mut events) = Orchestrator::spawn(
            Arc::clone(&self.registry),
            Arc::clone(&self.index),
            self.search,
        );
        let mut board = ResultBoard::new(Arc::clone(&self.index), self.search.max_results);

        orchestrator.set_query(text)?;
        while let Some(event) = events.recv().await {
            let settled = matches!(
                event,
                SearchEvent::RoundComplete { .. } | SearchEvent::Browse { .. }
            );
            board.apply(event);
            if settled {
                break;
            }
        }

        orchestrator.shutdown().await;
        debug!(round = board.round(), entries = board.entries().len(), "query settled");
        if board.round() == 0 {
            return Err(anyhow!("search ended before any round completed"));
        }
        Ok(board)
    }

    /// Activate the provider whose display name is `name`.
    pub(crate) async fn open(&self, name: &str) -> Result<Activation> {
        let (id, _) = self
            .registry
            .find_by_name(name)
            .ok_or_else(|| anyhow!("no provider named '{name}'"))?;

        let mut launcher = Launcher::new(Arc::clone(&self.registry));
        launcher
            .activate(Selection::Provider(id))
            .await
            .with_context(|| format!("failed to open '{name}'"))
    }
}
