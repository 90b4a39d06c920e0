use std::sync::Arc;

use toolbelt_provider_api::SearchResult;
use toolbelt_ranking::RankingEngine;

use super::events::{LocalMatch, SearchEvent};
use crate::activation::Selection;
use crate::registry::ProviderId;

/// One row of the displayed list.
#[derive(Debug, Clone)]
pub enum DisplayedEntry {
    /// A provider from the local index.
    Provider {
        id: ProviderId,
        title: String,
        description: String,
        score: f64,
    },
    /// A result produced by a search source.
    Result {
        provider: ProviderId,
        result: SearchResult,
    },
}

impl DisplayedEntry {
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Provider { title, .. } => title,
            Self::Result { result, .. } => result.title(),
        }
    }

    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::Provider { description, .. } => description,
            Self::Result { result, .. } => result.description(),
        }
    }

    /// Name of the search source for results; `None` for providers.
    #[must_use]
    pub fn source_name(&self) -> Option<&str> {
        match self {
            Self::Provider { .. } => None,
            Self::Result { result, .. } => Some(result.source_name()),
        }
    }

    /// What activating this row should do.
    #[must_use]
    pub fn selection(&self) -> Selection {
        match self {
            Self::Provider { id, .. } => Selection::Provider(*id),
            Self::Result { provider, result } => Selection::Result {
                provider: *provider,
                result: result.clone(),
            },
        }
    }
}

impl From<LocalMatch> for DisplayedEntry {
    fn from(local: LocalMatch) -> Self {
        Self::Provider {
            id: local.provider,
            title: local.title,
            description: local.description,
            score: local.score,
        }
    }
}

/// Headless model of the result list a launcher window would render.
///
/// Starts out browsing the local index. Applying events clears the list at
/// the start of every round and appends only results of the newest round,
/// in the order they arrive.
#[derive(Debug, Clone)]
pub struct ResultBoard {
    index: Arc<RankingEngine<ProviderId>>,
    browse_limit: usize,
    round: u64,
    query: String,
    entries: Vec<DisplayedEntry>,
    complete: bool,
}

impl ResultBoard {
    #[must_use]
    pub fn new(index: Arc<RankingEngine<ProviderId>>, browse_limit: usize) -> Self {
        let mut board = Self {
            index,
            browse_limit,
            round: 0,
            query: String::new(),
            entries: Vec::new(),
            complete: true,
        };
        board.show_all();
        board
    }

    /// Fold `event` into the board. Returns `false` when it was ignored.
    pub fn apply(&mut self, event: SearchEvent) -> bool {
        if event.round() < self.round {
            return false;
        }

        match event {
            SearchEvent::RoundStarted { round, query } => {
                self.round = round;
                self.query = query;
                self.entries.clear();
                self.complete = false;
            }
            SearchEvent::Browse { round } => {
                self.round = round;
                self.query.clear();
                self.show_all();
                self.complete = true;
            }
            SearchEvent::LocalResults { round, matches } if round == self.round => {
                self.entries
                    .extend(matches.into_iter().map(DisplayedEntry::from));
            }
            SearchEvent::ProviderResults {
                round,
                provider,
                results,
                ..
            } if round == self.round => {
                self.entries.extend(
                    results
                        .into_iter()
                        .map(|result| DisplayedEntry::Result { provider, result }),
                );
            }
            SearchEvent::RoundComplete { round } if round == self.round => {
                self.complete = true;
            }
            _ => return false,
        }
        true
    }

    #[must_use]
    pub fn entries(&self) -> &[DisplayedEntry] {
        &self.entries
    }

    #[must_use]
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Query of the displayed round; empty while browsing.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn is_browsing(&self) -> bool {
        self.query.is_empty()
    }

    /// Whether every task of the displayed round has reported.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    #[must_use]
    pub fn selection(&self, position: usize) -> Option<Selection> {
        self.entries.get(position).map(DisplayedEntry::selection)
    }

    /// Browse mode lists the indexed providers, capped at the browse limit.
    /// Search sources are never indexed: they only answer queries and cannot
    /// be activated on their own.
    fn show_all(&mut self) {
        self.entries = self
            .index
            .search("", self.browse_limit)
            .into_iter()
            .map(|scored| DisplayedEntry::Provider {
                id: scored.item.payload,
                title: scored.item.title.clone(),
                description: scored.item.description.clone(),
                score: scored.score,
            })
            .collect();
    }
}
