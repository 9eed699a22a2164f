//! Text normalization shared by indexing and querying.
//!
//! Tokens containing any Cyrillic letter go through the Cyrillic stemmer, all
//! other tokens through the default-language stemmer. Stemmed tokens are
//! rejoined with single spaces and every character that is neither a word
//! character nor whitespace is removed. Digits and underscores survive.
//!
//! Non-Cyrillic words are stemmed with Snowball, not lemmatized, so
//! `"studies"` becomes `"studi"` rather than `"study"`. Queries and chunks
//! share this path, so matching is unaffected.

use regex::Regex;
use tantivy::tokenizer::{Language, TextAnalyzer};

use docseek_core::config::NormalizerSettings;
use docseek_core::error::{Error, Result};
use docseek_core::traits::Normalize;

use crate::analyzer::{build_stemmer, language_from_name, stem_word};

/// Words (optionally joined by hyphens or apostrophes) or punctuation runs.
const TOKEN_PATTERN: &str = r"\w+(?:[-'’]\w+)*|[^\w\s]+";
const NON_WORD_PATTERN: &str = r"[^\w\s]";

#[derive(Clone)]
pub struct Normalizer {
    tokens: Regex,
    non_word: Regex,
    cyrillic: TextAnalyzer,
    default: TextAnalyzer,
}

impl std::fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Normalizer").finish_non_exhaustive()
    }
}

impl Normalizer {
    pub fn new(cyrillic: Language, default: Language) -> Result<Self> {
        let tokens = Regex::new(TOKEN_PATTERN).map_err(|e| Error::NormalizationFailure(e.to_string()))?;
        let non_word = Regex::new(NON_WORD_PATTERN).map_err(|e| Error::NormalizationFailure(e.to_string()))?;
        Ok(Self { tokens, non_word, cyrillic: build_stemmer(cyrillic), default: build_stemmer(default) })
    }

    /// Russian stemming for Cyrillic tokens, English for everything else.
    pub fn russian_english() -> Result<Self> {
        Self::new(Language::Russian, Language::English)
    }

    /// Resolve configured language names. Unknown names fail here, at startup.
    pub fn from_settings(settings: &NormalizerSettings) -> Result<Self> {
        let cyrillic = language_from_name(&settings.cyrillic_language)?;
        let default = language_from_name(&settings.default_language)?;
        tracing::debug!(cyrillic = %settings.cyrillic_language, default = %settings.default_language, "normalizer ready");
        Self::new(cyrillic, default)
    }

    pub fn normalize_text(&self, text: &str) -> String {
        let mut cyrillic = self.cyrillic.clone();
        let mut default = self.default.clone();
        let stemmed: Vec<String> = self
            .tokens
            .find_iter(text)
            .map(|m| {
                let token = m.as_str();
                if has_cyrillic(token) { stem_word(&mut cyrillic, token) } else { stem_word(&mut default, token) }
            })
            .collect();
        let joined = stemmed.join(" ");
        let stripped = self.non_word.replace_all(&joined, "");
        stripped.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl Normalize for Normalizer {
    fn normalize(&self, text: &str) -> String { self.normalize_text(text) }
}

/// Presence of any Cyrillic letter decides, not the majority script.
pub fn has_cyrillic(token: &str) -> bool {
    token.chars().any(|c| matches!(c, 'а'..='я' | 'А'..='Я' | 'ё' | 'Ё'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_script_tokens_count_as_cyrillic() {
        assert!(has_cyrillic("iPhoneы"));
        assert!(has_cyrillic("Ёж"));
        assert!(!has_cyrillic("hello_42"));
    }
}
