use crate::matcher::match_text;

/// Number of ranked items returned when the caller has no preference.
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// Channel weights applied to [`match_text`] scores.
pub const TITLE_WEIGHT: f64 = 1.0;
pub const DESCRIPTION_WEIGHT: f64 = 0.8;
pub const KEYWORD_WEIGHT: f64 = 0.9;

/// Score given to every item when browsing with an empty query.
const BROWSE_SCORE: f64 = 1.0;

/// A record in the local index.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchableItem<P> {
	pub title: String,
	pub description: String,
	pub keywords: Vec<String>,
	pub payload: P,
}

impl<P> SearchableItem<P> {
	#[must_use]
	pub fn new(title: impl Into<String>, payload: P) -> Self {
		Self {
			title: title.into(),
			description: String::new(),
			keywords: Vec::new(),
			payload,
		}
	}

	#[must_use]
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}

	#[must_use]
	pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.keywords = keywords.into_iter().map(Into::into).collect();
		self
	}

	/// Best weighted score across title, description and keywords.
	fn score(&self, query: &str) -> f64 {
		let mut best = match_text(query, &self.title) * TITLE_WEIGHT;

		if !self.description.is_empty() {
			best = best.max(match_text(query, &self.description) * DESCRIPTION_WEIGHT);
		}

		for keyword in &self.keywords {
			best = best.max(match_text(query, keyword) * KEYWORD_WEIGHT);
		}

		best
	}
}

/// An indexed item paired with its relevance for one query.
#[derive(Debug, Clone)]
pub struct ScoredItem<'a, P> {
	pub item: &'a SearchableItem<P>,
	pub score: f64,
}

/// Owns the local index and ranks queries against it.
#[derive(Debug, Clone)]
pub struct RankingEngine<P> {
	items: Vec<SearchableItem<P>>,
}

impl<P> RankingEngine<P> {
	#[must_use]
	pub fn new() -> Self {
		Self { items: Vec::new() }
	}

	pub fn add_item(&mut self, item: SearchableItem<P>) {
		self.items.push(item);
	}

	pub fn add_items<I>(&mut self, items: I)
	where
		I: IntoIterator<Item = SearchableItem<P>>,
	{
		self.items.extend(items);
	}

	pub fn clear(&mut self) {
		self.items.clear();
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.items.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Indexed items in insertion order.
	#[must_use]
	pub fn items(&self) -> &[SearchableItem<P>] {
		&self.items
	}

	/// Rank the index against `query`, best match first.
	///
	/// A blank query browses the index: the first `max_results` items are
	/// returned in insertion order, all scored `1.0`. Otherwise only items
	/// that matched through at least one channel are returned, sorted by
	/// descending score; ties keep their insertion order.
	#[must_use]
	pub fn search(&self, query: &str, max_results: usize) -> Vec<ScoredItem<'_, P>> {
		let query = query.trim();
		if query.is_empty() {
			return self
				.items
				.iter()
				.take(max_results)
				.map(|item| ScoredItem {
					item,
					score: BROWSE_SCORE,
				})
				.collect();
		}

		let mut ranked: Vec<ScoredItem<'_, P>> = self
			.items
			.iter()
			.filter_map(|item| {
				let score = item.score(query);
				(score > 0.0).then_some(ScoredItem { item, score })
			})
			.collect();

		ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
		ranked.truncate(max_results);
		ranked
	}
}

impl<P> Default for RankingEngine<P> {
	fn default() -> Self {
		Self::new()
	}
}

impl<P> FromIterator<SearchableItem<P>> for RankingEngine<P> {
	fn from_iter<I: IntoIterator<Item = SearchableItem<P>>>(iter: I) -> Self {
		Self {
			items: iter.into_iter().collect(),
		}
	}
}
