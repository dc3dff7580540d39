//! EPUB tokenizer: walks the spine and flattens every chapter into one
//! word sequence, with a table-of-contents entry per non-empty chapter.

use std::io;

use super::Tokenized;
use super::opf::{CONTAINER_PATH, is_html_path, parse_container, parse_opf};
use super::words::split_words;
use crate::archive::{Archive, ZipEntries};
use crate::document::TocEntry;
use crate::error::{Error, Result};
use crate::markup::{HtmlParser, MarkupParser, MarkupTree, chapter_title, extract_text_with_spacing};

/// Non-fatal conditions reported alongside a successful import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportWarning {
    /// Some spine chapters were missing or unparsable.
    PartialChapterFailure { failed: usize, succeeded: usize },
    /// The document was stored, but its source file could not be copied.
    SourceCopyFailed(String),
}

impl std::fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportWarning::PartialChapterFailure { failed, .. } => write!(
                f,
                "Warning: {} chapter(s) could not be parsed. The book may be incomplete.",
                failed
            ),
            ImportWarning::SourceCopyFailed(reason) => {
                write!(f, "Could not save a copy of the source file: {}", reason)
            }
        }
    }
}

/// Outcome of tokenizing an EPUB.
#[derive(Debug, Clone)]
pub struct EpubImport {
    pub tokenized: Tokenized,
    pub succeeded_chapters: usize,
    pub failed_chapters: usize,
}

impl EpubImport {
    /// Partial-failure warning, present when some but not all chapters failed.
    pub fn warning(&self) -> Option<ImportWarning> {
        (self.failed_chapters > 0 && self.succeeded_chapters > 0).then_some(
            ImportWarning::PartialChapterFailure {
                failed: self.failed_chapters,
                succeeded: self.succeeded_chapters,
            },
        )
    }
}

/// Tokenize an EPUB held in memory as zip bytes.
pub fn tokenize_epub_bytes(data: &[u8]) -> Result<EpubImport> {
    let archive = ZipEntries::new(data)?;
    tokenize_epub(&archive, &HtmlParser)
}

/// Tokenize an EPUB through any archive and markup parser.
pub fn tokenize_epub<A, P>(archive: &A, parser: &P) -> Result<EpubImport>
where
    A: Archive + ?Sized,
    P: MarkupParser,
{
    if !archive.contains(CONTAINER_PATH) {
        return Err(Error::InvalidContainer);
    }
    let container = archive.read_text(CONTAINER_PATH).map_err(parse_failure)?;
    let opf_path = parse_container(&container)?;
    log::debug!("Rootfile: {}", opf_path);

    let opf = archive
        .read_text(&opf_path)
        .map_err(|_| Error::MissingContentFile)?;
    let package = parse_opf(&opf, &opf_path)?;
    log::debug!(
        "Manifest items: {}, spine items: {}",
        package.manifest.len(),
        package.spine.len()
    );

    if package.spine.is_empty() {
        return Err(Error::EmptySpine);
    }

    let mut words: Vec<String> = Vec::new();
    let mut toc: Vec<TocEntry> = Vec::new();
    let mut succeeded = 0usize;
    let mut failed = 0usize;

    for path in package.spine_paths().filter(|p| is_html_path(p)) {
        let chapter = match read_chapter(archive, parser, path) {
            Ok(chapter) => chapter,
            Err(e) => {
                log::warn!("Skipping chapter {}: {}", path, e);
                failed += 1;
                continue;
            }
        };

        let title = chapter
            .title
            .unwrap_or_else(|| format!("Chapter {}", succeeded + 1));
        if !chapter.words.is_empty() {
            toc.push(TocEntry {
                title,
                word_index: words.len(),
            });
        }
        words.extend(chapter.words);
        succeeded += 1;
    }

    log::debug!(
        "Total words: {}, chapters parsed: {}, failed: {}",
        words.len(),
        succeeded,
        failed
    );

    if words.is_empty() {
        return Err(Error::NoReadableText);
    }

    Ok(EpubImport {
        tokenized: Tokenized { words, toc },
        succeeded_chapters: succeeded,
        failed_chapters: failed,
    })
}

struct Chapter {
    title: Option<String>,
    words: Vec<String>,
}

fn read_chapter<A, P>(archive: &A, parser: &P, path: &str) -> Result<Chapter>
where
    A: Archive + ?Sized,
    P: MarkupParser,
{
    let html = archive.read_text(path)?;
    let tree = parser.parse(&html)?;
    let text = tree
        .body()
        .map(|body| extract_text_with_spacing(&tree, body))
        .unwrap_or_default();
    Ok(Chapter {
        title: chapter_title(&tree),
        words: split_words(&text),
    })
}

fn parse_failure(e: io::Error) -> Error {
    Error::Parse(e.to_string())
}
