//! Persisted document records.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::tokenize::Tokenized;
use crate::util::time_seed_nanos;

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// Opaque document identifier, fixed at import time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh id: `now` in base 36 followed by a short hash of the file
    /// name, its size and a time seed.
    pub fn generate(filename: &str, size: u64, now: Timestamp) -> Self {
        let mut hasher = sha1_smol::Sha1::new();
        hasher.update(&time_seed_nanos().to_le_bytes());
        hasher.update(filename.as_bytes());
        hasher.update(&size.to_le_bytes());
        let digest = hasher.digest().to_string();
        Self(format!("{}{}", to_base36(now), &digest[..12]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// Source format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Txt,
    Epub,
}

impl DocumentFormat {
    pub const TXT_MIME: &'static str = "text/plain";
    pub const EPUB_MIME: &'static str = "application/epub+zip";

    /// Detect the format from a file name and optional MIME type.
    ///
    /// Extensions are compared ASCII case-insensitively. Returns `None`
    /// for anything that is neither plain text nor EPUB.
    pub fn detect(file_name: &str, mime_type: Option<&str>) -> Option<Self> {
        let ext = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match (ext.as_deref(), mime_type) {
            (Some("epub"), _) | (_, Some(Self::EPUB_MIME)) => Some(DocumentFormat::Epub),
            (Some("txt"), _) | (_, Some(Self::TXT_MIME)) => Some(DocumentFormat::Txt),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Txt => "txt",
            DocumentFormat::Epub => "epub",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Named jump target within a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TocEntry {
    pub title: String,
    pub word_index: usize,
}

/// A tokenized document and its reading progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    pub filename: String,
    pub format: DocumentFormat,
    /// Shared so open sessions can view the words without copying them.
    pub words: Arc<[String]>,
    #[serde(default)]
    pub toc: Option<Vec<TocEntry>>,
    pub last_read_position: usize,
    pub total_words: usize,
    pub added_at: Timestamp,
    pub last_accessed_at: Timestamp,
    /// Where the durable copy of the source file was written, if anywhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filepath: Option<String>,
}

impl Document {
    /// New record at position zero, stamped `now`.
    ///
    /// An empty table of contents is stored as absent.
    pub fn new(
        id: DocumentId,
        filename: impl Into<String>,
        format: DocumentFormat,
        tokenized: Tokenized,
        now: Timestamp,
    ) -> Self {
        let Tokenized { words, toc } = tokenized;
        let total_words = words.len();
        Self {
            id,
            filename: filename.into(),
            format,
            words: words.into(),
            toc: (!toc.is_empty()).then_some(toc),
            last_read_position: 0,
            total_words,
            added_at: now,
            last_accessed_at: now,
            filepath: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Table of contents, empty when the format produced none.
    pub fn toc_entries(&self) -> &[TocEntry] {
        self.toc.as_deref().unwrap_or(&[])
    }

    /// `index` clamped into `[0, words.len() - 1]`, or 0 for an empty document.
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.words.len().saturating_sub(1))
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            id: self.id.clone(),
            filename: self.filename.clone(),
            format: self.format,
            total_words: self.total_words,
            last_read_position: self.last_read_position,
            added_at: self.added_at,
            last_accessed_at: self.last_accessed_at,
        }
    }
}

/// Library-list view of a document, without its words.
///
/// Deserializes from a full [`Document`] record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: DocumentId,
    pub filename: String,
    pub format: DocumentFormat,
    pub total_words: usize,
    pub last_read_position: usize,
    pub added_at: Timestamp,
    pub last_accessed_at: Timestamp,
}

impl DocumentSummary {
    /// Rounded reading progress in percent; 0 for an empty document.
    pub fn progress_percent(&self) -> u32 {
        if self.total_words == 0 {
            return 0;
        }
        (self.last_read_position as f64 / self.total_words as f64 * 100.0).round() as u32
    }
}
