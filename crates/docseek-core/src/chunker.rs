//! Sentence-respecting chunking.
//!
//! Text is split into sentences at `.`, `?` or `!` followed by whitespace and
//! the sentences are packed greedily into chunks of at most `max_len`
//! characters. A sentence is never split, so a single sentence longer than
//! `max_len` becomes its own oversized chunk.
//!
//! The boundary rule knows nothing about abbreviations: `"Dr. Smith"` ends a
//! sentence after `"Dr."`. Callers rely on this exact split.

use crate::traits::TextChunker;

#[derive(Debug, Clone, Copy, Default)]
pub struct SentenceChunker;

impl SentenceChunker {
    pub fn new() -> Self { Self }

    /// Split `text` into sentences, each ending with its terminator.
    ///
    /// The whitespace run after a terminator is consumed; whitespace inside a
    /// sentence is kept as is.
    pub fn split_sentences(text: &str) -> Vec<&str> {
        let mut sentences = Vec::new();
        let mut start = 0usize;
        let mut chars = text.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if !matches!(c, '.' | '?' | '!') { continue; }
            let end = i + c.len_utf8();
            let mut next_start = end;
            while let Some(&(j, w)) = chars.peek() {
                if !w.is_whitespace() { break; }
                next_start = j + w.len_utf8();
                chars.next();
            }
            if next_start > end {
                sentences.push(&text[start..end]);
                start = next_start;
            }
        }
        sentences.push(&text[start..]);
        sentences
    }

    /// Greedily pack sentences into chunks of at most `max_len` characters.
    ///
    /// Empty input yields a single empty chunk, never an empty sequence.
    pub fn chunk_text(&self, text: &str, max_len: usize) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;
        for sentence in Self::split_sentences(text) {
            if sentence.trim().is_empty() { continue; }
            let sentence_len = sentence.chars().count();
            if current_len + sentence_len + 1 > max_len && !current.is_empty() {
                chunks.push(current.trim().to_string());
                current.clear();
                current_len = 0;
            }
            current.push_str(sentence);
            current.push(' ');
            current_len += sentence_len + 1;
        }
        if !current.is_empty() {
            chunks.push(current.trim().to_string());
        }
        if chunks.is_empty() {
            // keeps positional correspondence with the input document
            chunks.push(String::new());
        }
        chunks
    }
}

impl TextChunker for SentenceChunker {
    fn chunk(&self, text: &str, max_len: usize) -> Vec<String> { self.chunk_text(text, max_len) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_terminator_followed_by_whitespace() {
        let s = SentenceChunker::split_sentences("One. Two?  Three!\nFour");
        assert_eq!(s, vec!["One.", "Two?", "Three!", "Four"]);
    }

    #[test]
    fn terminator_without_whitespace_does_not_split() {
        let s = SentenceChunker::split_sentences("version 1.2 is out.");
        assert_eq!(s, vec!["version 1.2 is out."]);
    }

    #[test]
    fn trailing_whitespace_leaves_an_empty_tail() {
        let s = SentenceChunker::split_sentences("Done. ");
        assert_eq!(s, vec!["Done.", ""]);
        assert_eq!(SentenceChunker.chunk_text("Done. ", 100), vec!["Done."]);
    }
}
