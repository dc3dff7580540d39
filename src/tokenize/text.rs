//! Plain-text tokenizer.

use super::Tokenized;
use super::words::split_words;
use crate::document::TocEntry;

/// Landmarks synthesized for documents without chapters.
const PERCENT_MARKS: [usize; 5] = [0, 25, 50, 75, 100];

/// Tokenize decoded plain text.
///
/// The table of contents holds one entry per quarter of the word count,
/// each clamped to the last word. Text without words gets no entries.
pub fn tokenize_text(content: &str) -> Tokenized {
    let words = split_words(content);
    let toc = percentage_toc(words.len());
    Tokenized { words, toc }
}

/// Bookmarks at 0/25/50/75/100% of `word_count`.
pub fn percentage_toc(word_count: usize) -> Vec<TocEntry> {
    if word_count == 0 {
        return Vec::new();
    }
    PERCENT_MARKS
        .iter()
        .map(|&pct| TocEntry {
            title: format!("{}%", pct),
            word_index: (pct * word_count / 100).min(word_count - 1),
        })
        .collect()
}
