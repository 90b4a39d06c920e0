//! Debounced, cancellable fan-out of queries to the local index and every
//! search source.
//!
//! A single coordinating task owns the pending query, the debounce deadline
//! and the set of in-flight searches. Each search runs on the blocking pool
//! and reports back tagged with the round that spawned it; reports from a
//! superseded round are dropped before they reach the event stream.

mod board;
mod events;


use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::{self, JoinError, JoinHandle, JoinSet};
use tokio::time::{Instant, sleep_until, timeout};
use tokio_util::sync::CancellationToken;
use toolbelt_provider_api::{ProviderError, SearchResult};
use toolbelt_ranking::{DEFAULT_MAX_RESULTS, RankingEngine};
use tracing::{debug, trace, warn};

use crate::registry::{ProviderId, ProviderRegistry};

pub use board::{DisplayedEntry, ResultBoard};
pub use events::{LocalMatch, SearchEvent};

/// Stream of [`SearchEvent`]s produced by an [`Orchestrator`].
pub type EventReceiver = mpsc::UnboundedReceiver<SearchEvent>;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Name reported for failures of the local ranking task.
const LOCAL_INDEX: &str = "local index";

/// Timing and sizing knobs for the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Quiet period after the last keystroke before a round starts.
    pub debounce: Duration,
    /// Maximum number of local matches per round.
    pub max_results: usize,
    /// How long shutdown waits for in-flight searches before detaching them.
    pub shutdown_grace: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            max_results: DEFAULT_MAX_RESULTS,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }
}

/// Returned by [`Orchestrator::set_query`] once the coordinator has stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("the query orchestrator has shut down")]
pub struct OrchestratorClosed;

/// Messages understood by the coordinating task.
#[derive(Debug)]
enum Command {
    Query(String),
    Shutdown,
}

/// Handle to the coordinating task.
#[derive(Debug)]
pub struct Orchestrator {
    commands: mpsc::UnboundedSender<Command>,
    round: Arc<AtomicU64>,
    coordinator: JoinHandle<()>,
}

impl Orchestrator {
    /// Start the coordinating task on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    #[must_use]
    pub fn spawn(
        registry: Arc<ProviderRegistry>,
        index: Arc<RankingEngine<ProviderId>>,
        config: OrchestratorConfig,
    ) -> (Self, EventReceiver) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let round = Arc::new(AtomicU64::new(0));

        let coordinator = Coordinator {
            registry,
            index,
            config,
            events: event_tx,
            round: Arc::clone(&round),
            pending: None,
            deadline: None,
            token: CancellationToken::new(),
            tasks: JoinSet::new(),
            rounds: HashMap::new(),
            outstanding: 0,
        };
        let coordinator = tokio::spawn(coordinator.run(command_rx));

        let handle = Self {
            commands: command_tx,
            round,
            coordinator,
        };
        (handle, event_rx)
    }

    /// Record new query text and restart the debounce timer.
    pub fn set_query(&self, text: impl Into<String>) -> Result<(), OrchestratorClosed> {
        self.commands
            .send(Command::Query(text.into()))
            .map_err(|_| OrchestratorClosed)
    }

    /// Identifier of the most recently started round; `0` before the first.
    #[must_use]
    pub fn current_round(&self) -> u64 {
        self.round.load(Ordering::SeqCst)
    }

    /// Cancel outstanding work and wait for the coordinator to finish.
    ///
    /// In-flight searches get the configured grace period to return; any
    /// still running afterwards are detached and their results discarded.
    pub async fn shutdown(self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Err(err) = self.coordinator.await {
            warn!(error = %err, "query coordinator terminated abnormally");
        }
    }
}

/// Where a task's results came from.
#[derive(Debug, Clone)]
enum Origin {
    Local,
    Source { id: ProviderId, name: String },
}

impl Origin {
    fn name(&self) -> &str {
        match self {
            Self::Local => LOCAL_INDEX,
            Self::Source { name, .. } => name,
        }
    }
}

#[derive(Debug)]
enum Found {
    Local(Vec<LocalMatch>),
    Source(Vec<SearchResult>),
}

#[derive(Debug, Error)]
enum TaskError {
    #[error("round was superseded")]
    Cancelled,
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[derive(Debug)]
struct TaskReport {
    round: u64,
    origin: Origin,
    outcome: Result<Found, TaskError>,
}

struct Coordinator {
    registry: Arc<ProviderRegistry>,
    index: Arc<RankingEngine<ProviderId>>,
    config: OrchestratorConfig,
    events: mpsc::UnboundedSender<SearchEvent>,
    round: Arc<AtomicU64>,
    pending: Option<String>,
    deadline: Option<Instant>,
    token: CancellationToken,
    tasks: JoinSet<TaskReport>,
    /// Round each in-flight task was spawned for.
    rounds: HashMap<task::Id, u64>,
    /// Tasks of the current round that have not reported yet.
    outstanding: usize,
}

impl Coordinator {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        loop {
            let deadline = self.deadline;
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Query(text)) => self.schedule(text),
                    Some(Command::Shutdown) | None => break,
                },
                () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.deadline = None;
                    self.start_round();
                }
                Some(joined) = self.tasks.join_next_with_id(), if !self.tasks.is_empty() => {
                    self.collect(joined);
                }
            }
        }

        self.drain().await;
    }

    fn schedule(&mut self, text: String) {
        let query = text.trim().to_string();
        trace!(query = %query, "query text changed");
        self.pending = Some(query);
        self.deadline = Some(Instant::now() + self.config.debounce);
    }

    fn start_round(&mut self) {
        let query = self.pending.take().unwrap_or_default();

        self.token.cancel();
        self.token = CancellationToken::new();
        let round = self.round.fetch_add(1, Ordering::SeqCst) + 1;
        self.outstanding = 0;

        if query.is_empty() {
            debug!(round, "query cleared, browsing providers");
            self.emit(SearchEvent::Browse { round });
            return;
        }

        debug!(round, query = %query, "starting search round");
        self.emit(SearchEvent::RoundStarted {
            round,
            query: query.clone(),
        });

        let index = Arc::clone(&self.index);
        let max_results = self.config.max_results;
        let local_query = query.clone();
        self.spawn_task(round, Origin::Local, move || {
            let matches = index
                .search(&local_query, max_results)
                .into_iter()
                .map(|scored| LocalMatch {
                    provider: scored.item.payload,
                    title: scored.item.title.clone(),
                    description: scored.item.description.clone(),
                    score: scored.score,
                })
                .collect();
            Ok(Found::Local(matches))
        });

        let sources: Vec<_> = self
            .registry
            .search_sources()
            .map(|(id, source)| {
                let name = self
                    .registry
                    .get(id)
                    .map(|provider| provider.name().to_string())
                    .unwrap_or_default();
                (id, name, Arc::clone(source))
            })
            .collect();

        for (id, name, source) in sources {
            let query = query.clone();
            self.spawn_task(round, Origin::Source { id, name }, move || {
                source.search(&query).map(Found::Source)
            });
        }
    }

    fn spawn_task<F>(&mut self, round: u64, origin: Origin, job: F)
    where
        F: FnOnce() -> Result<Found, ProviderError> + Send + 'static,
    {
        self.outstanding += 1;
        let token = self.token.clone();
        let handle = self.tasks.spawn(run_task(round, origin, token, job));
        self.rounds.insert(handle.id(), round);
    }

    fn collect(&mut self, joined: Result<(task::Id, TaskReport), JoinError>) {
        let current = self.round.load(Ordering::SeqCst);
        let report = match joined {
            Ok((id, report)) => {
                self.rounds.remove(&id);
                report
            }
            Err(err) => {
                let round = self.rounds.remove(&err.id());
                warn!(error = %err, ?round, "search task terminated abnormally");
                if round == Some(current) {
                    self.task_finished(current);
                }
                return;
            }
        };

        if report.round != current {
            trace!(
                round = report.round,
                current,
                origin = report.origin.name(),
                "discarding results from a superseded round"
            );
            return;
        }

        let round = report.round;
        match (report.outcome, report.origin) {
            (Ok(Found::Local(matches)), _) => {
                debug!(round, matches = matches.len(), "local ranking finished");
                self.emit(SearchEvent::LocalResults { round, matches });
            }
            (Ok(Found::Source(results)), Origin::Source { id, name }) => {
                debug!(round, provider = %name, results = results.len(), "search source answered");
                self.emit(SearchEvent::ProviderResults {
                    round,
                    provider: id,
                    provider_name: name,
                    results,
                });
            }
            (Ok(Found::Source(_)), Origin::Local) => {}
            (Err(TaskError::Cancelled), origin) => {
                trace!(round, origin = origin.name(), "search cancelled");
            }
            (Err(TaskError::Provider(err)), origin) => {
                warn!(
                    round,
                    provider = origin.name(),
                    error = %err,
                    "search failed, no results this round"
                );
            }
        }

        self.task_finished(round);
    }

    fn task_finished(&mut self, round: u64) {
        self.outstanding = self.outstanding.saturating_sub(1);
        if self.outstanding == 0 {
            debug!(round, "search round complete");
            self.emit(SearchEvent::RoundComplete { round });
        }
    }

    fn emit(&self, event: SearchEvent) {
        if self.events.send(event).is_err() {
            trace!("search event receiver dropped");
        }
    }

    async fn drain(mut self) {
        self.token.cancel();
        self.deadline = None;

        let grace = self.config.shutdown_grace;
        let tasks = &mut self.tasks;
        let drained = timeout(grace, async {
            while tasks.join_next().await.is_some() {}
        })
        .await;

        if drained.is_err() {
            warn!(
                remaining = self.tasks.len(),
                grace_ms = grace.as_millis(),
                "searches still running after the shutdown grace period, detaching"
            );
            self.tasks.detach_all();
        }
        debug!("query coordinator stopped");
    }
}

/// Run `job` on the blocking pool and tag its outcome with `round`.
///
/// Provider calls cannot be interrupted. A cancelled round skips the call
/// when it has not started yet and discards its outcome otherwise.
async fn run_task<F>(round: u64, origin: Origin, token: CancellationToken, job: F) -> TaskReport
where
    F: FnOnce() -> Result<Found, ProviderError> + Send + 'static,
{
    let worker_token = token.clone();
    let joined = tokio::task::spawn_blocking(move || {
        if worker_token.is_cancelled() {
            return Err(TaskError::Cancelled);
        }
        job().map_err(TaskError::from)
    })
    .await;

    let outcome = match joined {
        Ok(_) if token.is_cancelled() => Err(TaskError::Cancelled),
        Ok(outcome) => outcome,
        Err(err) => Err(TaskError::Provider(ProviderError::Panicked {
            provider: origin.name().to_string(),
            message: panic_message(err),
        })),
    };

    TaskReport {
        round,
        origin,
        outcome,
    }
}

pub(crate) fn panic_message(err: JoinError) -> String {
    match err.try_into_panic() {
        Ok(payload) => describe_panic(payload.as_ref()),
        Err(err) => err.to_string(),
    }
}

fn describe_panic(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
