//! Layered text ranking for the launcher's local index.
//!
//! [`match_text`] scores one query against one piece of text by walking a fixed
//! cascade of strategies (exact, substring, acronym, pinyin, character
//! overlap) and returning the first non-zero score. [`RankingEngine`] applies
//! that cascade to the title, description and keywords of every indexed item
//! and keeps only the items that matched somewhere.
//!
//! ```
//! use toolbelt_ranking::{RankingEngine, SearchableItem};
//!
//! let mut engine = RankingEngine::new();
//! engine.add_item(SearchableItem::new("Calculator", 1).with_description("Basic arithmetic"));
//! engine.add_item(SearchableItem::new("Color Converter", 2));
//!
//! // "cc" is the acronym of "Color Converter" and only a loose character
//! // overlap for "Calculator".
//! let ranked = engine.search("cc", 10);
//! assert_eq!(ranked[0].item.payload, 2);
//! assert!(ranked[0].score > ranked[1].score);
//! ```

mod engine;
mod matcher;
mod romanize;

pub use engine::{
	DEFAULT_MAX_RESULTS, DESCRIPTION_WEIGHT, KEYWORD_WEIGHT, RankingEngine, ScoredItem,
	SearchableItem, TITLE_WEIGHT,
};
pub use matcher::match_text;
pub use romanize::{MAX_READINGS, Romanized, romanization_available, romanize};
