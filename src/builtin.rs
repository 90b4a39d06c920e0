//! Entry points shipped with the launcher itself.

use std::io::{self, Write};

use serde::Deserialize;
use serde_json::Value;
use toolbelt_provider_api::{ProviderError, SearchResult, SearchSource};
use tracing::warn;

use crate::registry::SymbolTable;

/// Symbol under which [`BaseConverter`] is exported.
pub const BASE_CONVERTER_SYMBOL: &str = "base_converter";

/// Display name of the converter, also the key of its settings table.
pub const BASE_CONVERTER_NAME: &str = "Base Converter";

/// Export every built-in entry point into `symbols`.
///
/// `settings_for` looks up the opaque settings table of a provider by its
/// display name.
pub fn register_builtins<'a, F>(symbols: &mut SymbolTable, mut settings_for: F)
where
    F: FnMut(&str) -> Option<&'a Value>,
{
    let converter = BaseConverter::from_settings(settings_for(BASE_CONVERTER_NAME));
    symbols.register_search(BASE_CONVERTER_SYMBOL, converter);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
    Binary,
    Octal,
    Decimal,
    Hex,
}

impl Radix {
    const ALL: [Self; 4] = [Self::Decimal, Self::Hex, Self::Binary, Self::Octal];

    fn label(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Octal => "octal",
            Self::Decimal => "decimal",
            Self::Hex => "hexadecimal",
        }
    }

    fn render(self, value: u128, settings: BaseConverterSettings) -> String {
        match self {
            Self::Binary => format!("{value:#b}"),
            Self::Octal => format!("{value:#o}"),
            Self::Decimal => value.to_string(),
            Self::Hex if settings.lowercase_hex => format!("{value:#x}"),
            Self::Hex => format!("{value:#X}"),
        }
    }
}

/// Payload attached to every [`BaseConverter`] result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendering {
    pub radix: Radix,
    pub text: String,
}

/// Options read from the `[provider_settings."Base Converter"]` table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BaseConverterSettings {
    /// Render hexadecimal digits as `0xff` instead of `0xFF`.
    pub lowercase_hex: bool,
}

/// Converts an integer typed as decimal, `0x` hex, `0b` binary or `0o`
/// octal into the other notations.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseConverter {
    settings: BaseConverterSettings,
}

impl BaseConverter {
    #[must_use]
    pub fn new(settings: BaseConverterSettings) -> Self {
        Self { settings }
    }

    /// Build a converter from its settings table, falling back to the
    /// defaults when the table is absent or malformed.
    #[must_use]
    pub fn from_settings(table: Option<&Value>) -> Self {
        let settings = match table.map(|table| BaseConverterSettings::deserialize(table)) {
            Some(Ok(settings)) => settings,
            Some(Err(error)) => {
                warn!(provider = BASE_CONVERTER_NAME, %error, "ignoring invalid provider settings");
                BaseConverterSettings::default()
            }
            None => BaseConverterSettings::default(),
        };
        Self::new(settings)
    }

    #[must_use]
    pub fn settings(&self) -> BaseConverterSettings {
        self.settings
    }

    /// Parse `input` into its value and the notation it was written in.
    #[must_use]
    pub fn parse(input: &str) -> Option<(u128, Radix)> {
        let cleaned: String = input.trim().chars().filter(|c| *c != '_').collect();
        let lower = cleaned.to_ascii_lowercase();

        let (digits, radix) = if let Some(rest) = lower.strip_prefix("0x") {
            (rest, Radix::Hex)
        } else if let Some(rest) = lower.strip_prefix("0b") {
            (rest, Radix::Binary)
        } else if let Some(rest) = lower.strip_prefix("0o") {
            (rest, Radix::Octal)
        } else {
            (lower.as_str(), Radix::Decimal)
        };

        let base = match radix {
            Radix::Binary => 2,
            Radix::Octal => 8,
            Radix::Decimal => 10,
            Radix::Hex => 16,
        };
        if digits.is_empty() || digits.starts_with('+') {
            return None;
        }
        u128::from_str_radix(digits, base)
            .ok()
            .map(|value| (value, radix))
    }
}

impl SearchSource for BaseConverter {
    fn search(&self, query: &str) -> Result<Vec<SearchResult>, ProviderError> {
        let Some((value, input_radix)) = Self::parse(query) else {
            return Ok(Vec::new());
        };

        Ok(Radix::ALL
            .into_iter()
            .filter(|radix| *radix != input_radix)
            .map(|radix| {
                let text = radix.render(value, self.settings);
                SearchResult::new(
                    text.clone(),
                    format!("{} as {}", query.trim(), radix.label()),
                    BASE_CONVERTER_NAME,
                )
                .with_payload(Rendering { radix, text })
            })
            .collect())
    }

    fn execute_result(&self, result: &SearchResult) -> Result<(), ProviderError> {
        let rendering = result
            .payload_as::<Rendering>()
            .ok_or_else(|| ProviderError::failed("result was not produced by the base converter"))?;
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", rendering.text)?;
        Ok(())
    }
}
