use serde::Serialize;
use toolbelt_provider_api::SearchResult;

use crate::registry::ProviderId;

/// A locally indexed provider that matched the round's query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalMatch {
    pub provider: ProviderId,
    pub title: String,
    pub description: String,
    pub score: f64,
}

/// Updates streamed from the orchestrator to the presentation layer.
///
/// Every event carries the round it belongs to. Rounds only move forward,
/// and once `RoundStarted` or `Browse` for round `n` has been emitted no
/// event for an earlier round follows it.
#[derive(Debug, Clone)]
pub enum SearchEvent {
    /// A non-empty query is being searched; previous results are obsolete.
    RoundStarted { round: u64, query: String },
    /// The local index finished ranking.
    LocalResults { round: u64, matches: Vec<LocalMatch> },
    /// One search source answered, results in the provider's own order.
    ProviderResults {
        round: u64,
        provider: ProviderId,
        provider_name: String,
        results: Vec<SearchResult>,
    },
    /// The query was cleared; show the unfiltered provider list.
    Browse { round: u64 },
    /// Every task of the round has reported.
    RoundComplete { round: u64 },
}

impl SearchEvent {
    #[must_use]
    pub fn round(&self) -> u64 {
        match self {
            Self::RoundStarted { round, .. }
            | Self::LocalResults { round, .. }
            | Self::ProviderResults { round, .. }
            | Self::Browse { round }
            | Self::RoundComplete { round } => *round,
        }
    }
}
