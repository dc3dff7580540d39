//! Error types for glance operations.

use thiserror::Error;

use crate::document::DocumentId;

/// Errors that can occur while importing, storing or reading documents.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(
        "Invalid EPUB: Missing container.xml. This file may be corrupted or not a valid EPUB."
    )]
    InvalidContainer,

    #[error("Invalid EPUB: Cannot find content location in container.xml")]
    MissingRootfile,

    #[error("Invalid EPUB: Cannot find content file. The EPUB structure may be malformed.")]
    MissingContentFile,

    #[error("Invalid EPUB: No chapters found. The EPUB may be empty or corrupted.")]
    EmptySpine,

    #[error("EPUB contains no readable text. All chapters failed to parse or are empty.")]
    NoReadableText,

    #[error("No words found in document")]
    NoWords,

    /// Anything else that went wrong while reading an archive.
    #[error("Failed to parse EPUB file: {0}")]
    Parse(String),

    #[error("Unsupported file type: {0}. Please select a valid TXT or EPUB file.")]
    UnsupportedFormat(String),

    #[error("File is too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Document not found: {0}")]
    NotFound(DocumentId),
}

impl Error {
    /// True for errors that abort an import without creating a document.
    pub fn is_fatal_import(&self) -> bool {
        matches!(
            self,
            Error::InvalidContainer
                | Error::MissingRootfile
                | Error::MissingContentFile
                | Error::EmptySpine
                | Error::NoReadableText
                | Error::NoWords
                | Error::Parse(_)
        )
    }

    /// True for errors raised before parsing starts.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::UnsupportedFormat(_) | Error::FileTooLarge { .. })
    }

    /// Message suitable for showing to the reader.
    pub fn user_message(&self) -> String {
        if self.is_fatal_import() {
            format!("Error importing document: {self}")
        } else {
            self.to_string()
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Error::Parse(e.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(e: quick_xml::Error) -> Self {
        Error::Parse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
