use tantivy::tokenizer::{Language, LowerCaser, RawTokenizer, Stemmer, TextAnalyzer, TokenStream};

use docseek_core::error::{Error, Result};

/// Map a configured stemmer name to a Snowball language.
pub fn language_from_name(name: &str) -> Result<Language> {
    let lang = match name.trim().to_ascii_lowercase().as_str() {
        "arabic" => Language::Arabic,
        "danish" => Language::Danish,
        "dutch" => Language::Dutch,
        "english" => Language::English,
        "finnish" => Language::Finnish,
        "french" => Language::French,
        "german" => Language::German,
        "greek" => Language::Greek,
        "hungarian" => Language::Hungarian,
        "italian" => Language::Italian,
        "norwegian" => Language::Norwegian,
        "portuguese" => Language::Portuguese,
        "romanian" => Language::Romanian,
        "russian" => Language::Russian,
        "spanish" => Language::Spanish,
        "swedish" => Language::Swedish,
        "tamil" => Language::Tamil,
        "turkish" => Language::Turkish,
        other => return Err(Error::NormalizationFailure(format!("no stemmer for language '{}'", other))),
    };
    Ok(lang)
}

/// Single-token analyzer: the whole input is one token, lowercased then stemmed.
pub fn build_stemmer(language: Language) -> TextAnalyzer {
    TextAnalyzer::builder(RawTokenizer::default())
        .filter(LowerCaser)
        .filter(Stemmer::new(language))
        .build()
}

/// Run one word through `analyzer` and return the stemmed form.
pub fn stem_word(analyzer: &mut TextAnalyzer, word: &str) -> String {
    let mut stream = analyzer.token_stream(word);
    let mut out = String::new();
    while stream.advance() {
        if !out.is_empty() { out.push(' '); }
        out.push_str(&stream.token().text);
    }
    out
}
