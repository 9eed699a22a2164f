use docseek_core::traits::TextChunker;
use docseek_core::SentenceChunker;

fn chunk(text: &str, n: usize) -> Vec<String> {
    SentenceChunker::new().chunk(text, n)
}

#[test]
fn short_text_fits_in_one_chunk() {
    assert_eq!(chunk("Hello world. This is a test.", 50), vec!["Hello world. This is a test."]);
}

#[test]
fn empty_input_yields_one_empty_chunk() {
    assert_eq!(chunk("", 20), vec![String::new()]);
    assert_eq!(chunk("   \n ", 20), vec![String::new()]);
}

#[test]
fn single_word_is_kept() {
    assert_eq!(chunk("Word", 10), vec!["Word"]);
}

#[test]
fn mixed_terminators_split_into_separate_chunks() {
    let chunks = chunk("Question? Exclamation! Statement. Another one.", 10);
    assert_eq!(chunks, vec!["Question?", "Exclamation!", "Statement.", "Another one."]);
}

#[test]
fn abbreviations_end_a_sentence() {
    // "Dr." is its own sentence under the boundary rule
    let chunks = chunk("Dr. Smith is here. He will meet you at noon.", 10);
    assert_eq!(chunks, vec!["Dr.", "Smith is here.", "He will meet you at noon."]);

    let roomy = chunk("Dr. Smith is here. He will meet you at noon.", 50);
    assert_eq!(roomy, vec!["Dr. Smith is here. He will meet you at noon."]);
}

#[test]
fn oversized_sentence_is_never_split() {
    let long = "This single sentence is far longer than the configured bound allows.";
    let chunks = chunk(&format!("Hi. {long} Bye."), 20);
    assert_eq!(chunks, vec!["Hi.", long, "Bye."]);
}

#[test]
fn chunks_cover_every_sentence_in_order() {
    let text = "First sentence here. Second one follows! Does a third exist? Yes. \
                A fifth sentence that is a little longer than the others. Sixth.";
    let fifth = "A fifth sentence that is a little longer than the others.";

    assert_eq!(
        chunk(text, 1),
        vec!["First sentence here.", "Second one follows!", "Does a third exist?", "Yes.", fifth, "Sixth."]
    );
    assert_eq!(
        chunk(text, 25),
        vec!["First sentence here.", "Second one follows!", "Does a third exist? Yes.", fifth, "Sixth."]
    );
    assert_eq!(
        chunk(text, 40),
        vec!["First sentence here.", "Second one follows! Does a third exist?", "Yes.", fifth, "Sixth."]
    );
    assert_eq!(
        chunk(text, 80),
        vec![
            "First sentence here. Second one follows! Does a third exist? Yes.",
            "A fifth sentence that is a little longer than the others. Sixth.",
        ]
    );
    assert_eq!(
        chunk(text, 1000),
        vec!["First sentence here. Second one follows! Does a third exist? Yes. \
              A fifth sentence that is a little longer than the others. Sixth."]
    );
}

#[test]
fn each_packed_sentence_reserves_a_separator() {
    // "A. B." is 5 characters, but packing counts a trailing space per sentence
    assert_eq!(chunk("A. B.", 5), vec!["A.", "B."]);
    assert_eq!(chunk("A. B.", 6), vec!["A. B."]);
}

#[test]
fn chunks_respect_the_bound_when_sentences_fit() {
    let text = "Alpha beta. Gamma delta epsilon. Zeta eta. Theta iota kappa lambda. Mu. Nu xi omicron.";
    let max_len = 30;
    for sentence in SentenceChunker::split_sentences(text) {
        assert!(sentence.chars().count() < max_len);
    }
    for c in chunk(text, max_len) {
        assert!(c.chars().count() <= max_len, "chunk {c:?} exceeds {max_len}");
    }
}

#[test]
fn bound_is_measured_in_characters() {
    // 10 Cyrillic characters are 20 bytes
    let text = "Кошка спит. Пёс лает.";
    assert_eq!(chunk(text, 22), vec!["Кошка спит. Пёс лает."]);
    assert_eq!(chunk(text, 15), vec!["Кошка спит.", "Пёс лает."]);
}

#[test]
fn long_multiline_text_produces_chunks() {
    let paragraph = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Curabitur tincidunt ipsum at nibh efficitur. \
                     Pellentesque id libero ipsum. Ut luctus lacus condimentum, semper leo nec, fermentum diam.\n        ";
    let text = paragraph.repeat(20);
    let chunks = chunk(&text, 1000);
    assert!(chunks.len() > 1);
    assert!(chunks.iter().all(|c| !c.is_empty() && c.chars().count() <= 1000));
}
