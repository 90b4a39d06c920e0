/// One pinyin reading of the CJK characters found in a piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Romanized {
	/// Full syllables concatenated, e.g. `jisuanqi`.
	pub full: String,
	/// First letter of every syllable, e.g. `jsq`.
	pub initials: String,
}

/// Upper bound on the reading combinations produced for one text.
pub const MAX_READINGS: usize = 16;

/// Returns `true` when the crate was built with pinyin support.
#[must_use]
pub const fn romanization_available() -> bool {
	cfg!(feature = "romanization")
}

/// CJK Unified Ideographs, the block the pinyin channel understands.
fn is_cjk(ch: char) -> bool {
	('\u{4e00}'..='\u{9fff}').contains(&ch)
}

/// Romanize every CJK ideograph in `text`, ignoring everything else.
///
/// Polyphonic characters contribute each of their readings, so `重启` yields
/// both `zhongqi` and `chongqi`. The first entry always uses the most common
/// reading of every character and at most [`MAX_READINGS`] combinations are
/// kept. The result is empty when the text holds no ideographs or when
/// romanization is compiled out.
#[must_use]
pub fn romanize(text: &str) -> Vec<Romanized> {
	if !romanization_available() {
		return Vec::new();
	}

	let mut readings = vec![Romanized::default()];
	let mut seen_ideograph = false;
	for ch in text.chars().filter(|ch| is_cjk(*ch)) {
		seen_ideograph = true;
		let choices = syllables(ch);
		if choices.is_empty() {
			for reading in &mut readings {
				reading.full.push(ch);
				reading.initials.push(ch);
			}
			continue;
		}

		let mut extended = Vec::with_capacity(MAX_READINGS.min(readings.len() * choices.len()));
		'combine: for reading in &readings {
			for (full, initial) in &choices {
				if extended.len() == MAX_READINGS {
					break 'combine;
				}
				let mut next = reading.clone();
				next.full.push_str(full);
				next.initials.push_str(initial);
				extended.push(next);
			}
		}
		readings = extended;
	}

	if seen_ideograph {
		readings
	} else {
		Vec::new()
	}
}

/// Toneless readings of `ch`, most common first, without duplicates.
#[cfg(feature = "romanization")]
fn syllables(ch: char) -> Vec<(&'static str, &'static str)> {
	use pinyin::ToPinyinMulti;

	let mut syllables = Vec::new();
	if let Some(readings) = ch.to_pinyin_multi() {
		for pinyin in readings {
			let syllable = (pinyin.plain(), pinyin.first_letter());
			if !syllables.contains(&syllable) {
				syllables.push(syllable);
			}
		}
	}
	syllables
}

#[cfg(not(feature = "romanization"))]
fn syllables(_ch: char) -> Vec<(&'static str, &'static str)> {
	Vec::new()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn text_without_ideographs_is_not_romanized() {
		assert!(romanize("Calculator").is_empty());
		assert!(romanize("").is_empty());
	}

	#[cfg(feature = "romanization")]
	#[test]
	fn only_ideographs_contribute() {
		let readings = romanize("Open 计算器 now");
		assert_eq!(readings[0].full, "jisuanqi");
		assert_eq!(readings[0].initials, "jsq");
	}

	#[cfg(feature = "romanization")]
	#[test]
	fn separate_runs_are_concatenated() {
		let readings = romanize("计算 and 器");
		assert_eq!(readings[0].full, "jisuanqi");
	}

	#[cfg(feature = "romanization")]
	#[test]
	fn polyphonic_characters_offer_every_reading() {
		let readings = romanize("重启");
		let full: Vec<&str> = readings.iter().map(|r| r.full.as_str()).collect();
		assert!(full.contains(&"zhongqi"), "{full:?}");
		assert!(full.contains(&"chongqi"), "{full:?}");
		assert!(readings.iter().any(|r| r.initials == "cq"));
	}

	#[cfg(feature = "romanization")]
	#[test]
	fn combinations_are_capped() {
		// Every one of these characters has several readings.
		let readings = romanize("重行乐长重行乐长");
		assert!(!readings.is_empty());
		assert!(readings.len() <= MAX_READINGS);
	}
}
