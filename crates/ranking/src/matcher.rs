use crate::romanize::{Romanized, romanize};

/// Score for a case-insensitive exact match.
pub const EXACT_SCORE: f64 = 1.0;

/// Score when the query appears verbatim inside the text.
pub const CONTAINS_SCORE: f64 = 0.8;

/// Scores when the query equals, or is part of, the text's acronym.
pub const ACRONYM_EXACT_SCORE: f64 = 0.7;
pub const ACRONYM_PARTIAL_SCORE: f64 = 0.5;

/// Scores for the pinyin channel, full syllables first, then initials.
pub const PINYIN_EXACT_SCORE: f64 = 0.6;
pub const PINYIN_PARTIAL_SCORE: f64 = 0.4;
pub const INITIALS_EXACT_SCORE: f64 = 0.5;
pub const INITIALS_PARTIAL_SCORE: f64 = 0.3;

/// Character overlap is capped well below every structured match.
pub const FUZZY_WEIGHT: f64 = 0.2;
pub const FUZZY_MIN_RATIO: f64 = 0.5;
pub const FUZZY_MIN_QUERY_CHARS: usize = 2;

/// Scores `query` against `text`, returning a value in `0.0..=1.0`.
///
/// Strategies are tried in order and the first non-zero score wins:
///
/// 1. case-insensitive equality,
/// 2. case-insensitive containment,
/// 3. acronym built from the first letter of every Latin word,
/// 4. pinyin of the CJK characters (full syllables, then initials),
/// 5. share of query characters present anywhere in the text.
#[must_use]
pub fn match_text(query: &str, text: &str) -> f64 {
	if query.is_empty() || text.is_empty() {
		return 0.0;
	}

	let query = query.to_lowercase();
	let text_lower = text.to_lowercase();

	if query == text_lower {
		return EXACT_SCORE;
	}
	if text_lower.contains(&query) {
		return CONTAINS_SCORE;
	}

	let score = acronym_score(&query, text);
	if score > 0.0 {
		return score;
	}

	let score = romanized_score(&query, text);
	if score > 0.0 {
		return score;
	}

	fuzzy_score(&query, &text_lower)
}

/// First letter of every run of ASCII letters, lowercased.
fn acronym(text: &str) -> String {
	let mut acronym = String::new();
	let mut in_word = false;
	for ch in text.chars() {
		let is_letter = ch.is_ascii_alphabetic();
		if is_letter && !in_word {
			acronym.push(ch.to_ascii_lowercase());
		}
		in_word = is_letter;
	}
	acronym
}

fn acronym_score(query: &str, text: &str) -> f64 {
	let acronym = acronym(text);
	if acronym.is_empty() {
		return 0.0;
	}
	if query == acronym {
		ACRONYM_EXACT_SCORE
	} else if acronym.contains(query) {
		ACRONYM_PARTIAL_SCORE
	} else {
		0.0
	}
}

/// Best pinyin score over every reading of the text's ideographs.
fn romanized_score(query: &str, text: &str) -> f64 {
	romanize(text)
		.iter()
		.map(|reading| reading_score(query, reading))
		.fold(0.0, f64::max)
}

fn reading_score(query: &str, reading: &Romanized) -> f64 {
	if query == reading.full {
		PINYIN_EXACT_SCORE
	} else if reading.full.contains(query) {
		PINYIN_PARTIAL_SCORE
	} else if query == reading.initials {
		INITIALS_EXACT_SCORE
	} else if reading.initials.contains(query) {
		INITIALS_PARTIAL_SCORE
	} else {
		0.0
	}
}

fn fuzzy_score(query: &str, text: &str) -> f64 {
	let length = query.chars().count();
	if length < FUZZY_MIN_QUERY_CHARS {
		return 0.0;
	}

	let matches = query.chars().filter(|ch| text.contains(*ch)).count();
	if matches == 0 {
		return 0.0;
	}

	let ratio = matches as f64 / length as f64;
	if ratio >= FUZZY_MIN_RATIO {
		ratio * FUZZY_WEIGHT
	} else {
		0.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn approx(actual: f64, expected: f64) {
		assert!(
			(actual - expected).abs() < 1e-9,
			"expected {expected}, got {actual}"
		);
	}

	#[test]
	fn exact_match_ignores_case() {
		approx(match_text("Calculator", "Calculator"), EXACT_SCORE);
		approx(match_text("calculator", "CALCULATOR"), EXACT_SCORE);
	}

	#[test]
	fn substring_beats_acronym() {
		approx(match_text("calc", "Calculator"), CONTAINS_SCORE);
		approx(match_text("c", "Color Converter"), CONTAINS_SCORE);
	}

	#[test]
	fn acronym_matches_first_letters() {
		approx(match_text("cc", "Color Converter"), ACRONYM_EXACT_SCORE);
		approx(match_text("CC", "Color Converter"), ACRONYM_EXACT_SCORE);
		approx(match_text("qs", "Quick Shutdown Service"), ACRONYM_PARTIAL_SCORE);
	}

	#[test]
	fn acronym_splits_on_any_non_letter() {
		assert_eq!(acronym("folder-organizer v2 tool"), "fovt");
		assert_eq!(acronym("x11Forwarding"), "xf");
		assert_eq!(acronym("123"), "");
	}

	#[test]
	fn fuzzy_overlap_is_low_confidence() {
		// "xyz" shares nothing, "cxlz" shares two of four characters.
		approx(match_text("xyz", "Calculator"), 0.0);
		approx(match_text("cxlz", "Calculator"), 0.5 * FUZZY_WEIGHT);
		approx(match_text("tlcb", "Calculator"), 0.75 * FUZZY_WEIGHT);
	}

	#[test]
	fn fuzzy_requires_two_characters() {
		approx(match_text("z", "Calculator"), 0.0);
	}

	#[test]
	fn fuzzy_counts_repeated_query_characters() {
		// Both "o" positions count, the "f" does not.
		approx(match_text("foo", "Color"), (2.0 / 3.0) * FUZZY_WEIGHT);
	}

	#[test]
	fn empty_inputs_never_match() {
		approx(match_text("", "Calculator"), 0.0);
		approx(match_text("calc", ""), 0.0);
	}

	#[test]
	fn cascade_scores_stay_in_unit_range() {
		let texts = ["Calculator", "Color Converter", "计算器", "a", "Quick Shutdown"];
		let queries = ["c", "cc", "calc", "jsq", "zz", "quick shutdown", "qs"];
		for text in texts {
			for query in queries {
				let score = match_text(query, text);
				assert!((0.0..=1.0).contains(&score), "{query} vs {text} gave {score}");
			}
		}
	}

	#[cfg(feature = "romanization")]
	#[test]
	fn pinyin_channel_scores() {
		approx(match_text("jisuanqi", "计算器"), PINYIN_EXACT_SCORE);
		approx(match_text("suan", "计算器"), PINYIN_PARTIAL_SCORE);
		approx(match_text("jsq", "计算器"), INITIALS_EXACT_SCORE);
		approx(match_text("sq", "计算器"), INITIALS_PARTIAL_SCORE);
	}

	#[cfg(feature = "romanization")]
	#[test]
	fn polyphonic_readings_are_all_searchable() {
		approx(match_text("chongqi", "重启"), PINYIN_EXACT_SCORE);
		approx(match_text("zhongqi", "重启"), PINYIN_EXACT_SCORE);
		approx(match_text("cq", "重启"), INITIALS_EXACT_SCORE);
		approx(match_text("yinyue", "音乐"), PINYIN_EXACT_SCORE);
		approx(match_text("yinhang", "银行"), PINYIN_EXACT_SCORE);
	}

	#[cfg(feature = "romanization")]
	#[test]
	fn best_reading_wins() {
		// "yue" is only a partial hit on the second reading of 音乐.
		approx(match_text("yue", "音乐"), PINYIN_PARTIAL_SCORE);
		approx(match_text("kuaisuguanji", "快速关机"), PINYIN_EXACT_SCORE);
	}

	#[cfg(feature = "romanization")]
	#[test]
	fn pinyin_only_considers_cjk_runs() {
		approx(match_text("JSQ", "Calculator 计算器"), INITIALS_EXACT_SCORE);
	}

	#[cfg(not(feature = "romanization"))]
	#[test]
	fn pinyin_channel_is_silent_without_romanization() {
		approx(match_text("jisuanqi", "计算器"), 0.0);
	}
}
