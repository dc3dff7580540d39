//! Turning source documents into flat word sequences.
//!
//! Both formats run the same word pipeline ([`split_words`]): spacing
//! around punctuation, whitespace splitting, then merging single
//! punctuation tokens onto the previous word. They differ only in where
//! the text comes from and how the table of contents is built.

mod epub;
mod opf;
mod text;
mod words;

pub use epub::{EpubImport, ImportWarning, tokenize_epub, tokenize_epub_bytes};
pub use opf::{Package, parse_container, parse_opf, resolve_href};
pub use text::{percentage_toc, tokenize_text};
pub use words::{
    MERGED_PUNCTUATION, SPACED_PUNCTUATION, merge_trailing_punctuation, space_punctuation,
    split_words,
};

use crate::document::TocEntry;

/// Words and landmarks produced by a tokenizer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokenized {
    pub words: Vec<String>,
    pub toc: Vec<TocEntry>,
}

impl Tokenized {
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
