use docseek_core::config::NormalizerSettings;
use docseek_core::traits::Normalize;
use docseek_core::Error;
use docseek_text::Normalizer;

fn normalizer() -> Normalizer {
    Normalizer::russian_english().expect("normalizer")
}

#[test]
fn empty_and_punctuation_only_inputs_normalize_to_empty() {
    let n = normalizer();
    assert_eq!(n.normalize(""), "");
    assert_eq!(n.normalize("  ?!  ... --- "), "");
}

#[test]
fn russian_inflections_share_a_stem() {
    let n = normalizer();
    let a = n.normalize("кошка");
    assert_eq!(a, "кошк");
    assert_eq!(n.normalize("кошки"), a);
    assert_eq!(n.normalize("Кошкой"), a);
}

#[test]
fn english_words_are_stemmed_not_lemmatized() {
    let n = normalizer();
    assert_eq!(n.normalize("studies"), "studi");
    assert_eq!(n.normalize("studies"), n.normalize("studied"));
}

#[test]
fn english_inflections_are_reduced() {
    let n = normalizer();
    assert_eq!(n.normalize("running"), "run");
    assert_eq!(n.normalize("cats"), "cat");
}

#[test]
fn punctuation_is_stripped_and_spacing_collapsed() {
    let n = normalizer();
    let out = n.normalize("Кошка спит на стуле.");
    assert!(!out.contains('.'));
    assert!(!out.contains("  "));
    assert!(out.starts_with("кошк "));
    assert_eq!(out.split(' ').count(), 4);
}

#[test]
fn digits_and_underscores_are_word_characters() {
    let n = normalizer();
    let out = n.normalize("build_42 shipped in 2024!");
    assert!(out.contains("build_42"), "{out}");
    assert!(out.contains("2024"), "{out}");
}

#[test]
fn hyphenated_words_lose_the_hyphen() {
    let n = normalizer();
    assert_eq!(n.normalize("e-mail"), "email");
}

#[test]
fn normalization_is_idempotent() {
    let n = normalizer();
    for input in [
        "The cats are running quickly.",
        "Кошка спит на стуле.",
        "Собака бежит в парке!",
        "mixed текст with 42 items",
        "",
    ] {
        let once = n.normalize(input);
        assert_eq!(n.normalize(&once), once, "input {input:?}");
    }
}

#[test]
fn normalization_is_deterministic_across_clones() {
    let n = normalizer();
    let m = n.clone();
    let text = "Я повесил пиджак на стул. The jacket was hanging.";
    assert_eq!(n.normalize(text), m.normalize(text));
}

#[test]
fn unknown_language_fails_at_construction() {
    let settings = NormalizerSettings { cyrillic_language: "klingon".into(), default_language: "english".into() };
    let err = Normalizer::from_settings(&settings).unwrap_err();
    assert!(matches!(err, Error::NormalizationFailure(_)));

    let ok = Normalizer::from_settings(&NormalizerSettings::default());
    assert!(ok.is_ok());
}
