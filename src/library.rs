//! The document library: importing files and keeping the document list.

use crate::config::ImportConfig;
use crate::document::{Document, DocumentFormat, DocumentId, DocumentSummary, Timestamp};
use crate::error::{Error, Result};
use crate::store::{DocumentStore, SourceStore};
use crate::tokenize::{ImportWarning, tokenize_epub_bytes, tokenize_text};
use crate::util::decode_text;

/// A file handed to [`Library::import`].
#[derive(Debug, Clone)]
pub struct ImportRequest<'a> {
    pub file_name: &'a str,
    pub mime_type: Option<&'a str>,
    pub data: &'a [u8],
    pub now: Timestamp,
}

impl<'a> ImportRequest<'a> {
    pub fn new(file_name: &'a str, data: &'a [u8], now: Timestamp) -> Self {
        Self {
            file_name,
            mime_type: None,
            data,
            now,
        }
    }

    pub fn with_mime_type(mut self, mime_type: &'a str) -> Self {
        self.mime_type = Some(mime_type);
        self
    }
}

/// A successful import and anything that went wrong along the way.
#[derive(Debug, Clone)]
pub struct Imported {
    pub document: Document,
    pub warnings: Vec<ImportWarning>,
}

/// Document list backed by a [`DocumentStore`].
///
/// The library keeps an in-memory list of summaries in sync with the
/// store. It also implements [`DocumentStore`] itself, so a reading
/// session can save through it and the list reflects the new position.
pub struct Library<S: DocumentStore> {
    store: S,
    documents: Vec<DocumentSummary>,
    config: ImportConfig,
    sources: Option<Box<dyn SourceStore>>,
}

impl<S: DocumentStore> Library<S> {
    /// Load the document list from `store`.
    pub fn open(store: S) -> Result<Self> {
        Self::with_config(store, ImportConfig::default())
    }

    pub fn with_config(store: S, config: ImportConfig) -> Result<Self> {
        let documents = store.list()?;
        log::debug!("Loaded {} documents", documents.len());
        Ok(Self {
            store,
            documents,
            config,
            sources: None,
        })
    }

    /// Keep a durable copy of every imported file in `sources`.
    pub fn with_source_store(mut self, sources: impl SourceStore + 'static) -> Self {
        self.sources = Some(Box::new(sources));
        self
    }

    pub fn documents(&self) -> &[DocumentSummary] {
        &self.documents
    }

    pub fn get(&self, id: &DocumentId) -> Option<&DocumentSummary> {
        self.documents.iter().find(|d| &d.id == id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Validate, tokenize and store a new document.
    ///
    /// Nothing is written when validation or tokenization fails.
    pub fn import(&mut self, request: ImportRequest<'_>) -> Result<Imported> {
        let format = validate(&request, &self.config)?;
        log::info!(
            "Importing {} ({}, {} bytes)",
            request.file_name,
            format,
            request.data.len()
        );

        let mut warnings = Vec::new();
        let tokenized = match format {
            DocumentFormat::Txt => tokenize_text(&decode_text(request.data, None)),
            DocumentFormat::Epub => {
                let import = tokenize_epub_bytes(request.data)?;
                warnings.extend(import.warning());
                import.tokenized
            }
        };
        if tokenized.is_empty() {
            return Err(Error::NoWords);
        }

        let id = DocumentId::generate(request.file_name, request.data.len() as u64, request.now);
        let mut document = Document::new(id, request.file_name, format, tokenized, request.now);

        if let Some(sources) = self.sources.as_mut() {
            match sources.write_source(&document.id, format, request.data) {
                Ok(path) => document.filepath = Some(path),
                Err(e) => {
                    log::error!("Failed to copy file to internal storage: {}", e);
                    warnings.push(ImportWarning::SourceCopyFailed(e.to_string()));
                }
            }
        }

        self.store.write(&document.id, &document)?;
        self.documents.push(document.summary());
        for warning in &warnings {
            log::warn!("{}: {}", request.file_name, warning);
        }
        log::info!(
            "Imported {} as {} ({} words)",
            request.file_name,
            document.id,
            document.total_words
        );

        Ok(Imported { document, warnings })
    }

    /// Remove a document from the store, then from the list.
    ///
    /// The list is untouched when the store refuses.
    pub fn remove(&mut self, id: &DocumentId) -> Result<()> {
        self.store.delete(id)?;
        self.documents.retain(|d| &d.id != id);
        log::info!("Deleted document {}", id);
        Ok(())
    }
}

fn validate(request: &ImportRequest<'_>, config: &ImportConfig) -> Result<DocumentFormat> {
    let format = DocumentFormat::detect(request.file_name, request.mime_type)
        .ok_or_else(|| Error::UnsupportedFormat(request.file_name.to_string()))?;
    let size = request.data.len() as u64;
    if size > config.max_file_size {
        return Err(Error::FileTooLarge {
            size,
            limit: config.max_file_size,
        });
    }
    Ok(format)
}

impl<S: DocumentStore> DocumentStore for Library<S> {
    fn list(&self) -> Result<Vec<DocumentSummary>> {
        Ok(self.documents.clone())
    }

    fn read(&self, id: &DocumentId) -> Result<Document> {
        self.store.read(id)
    }

    fn write(&mut self, id: &DocumentId, doc: &Document) -> Result<()> {
        self.store.write(id, doc)?;
        let summary = doc.summary();
        match self.documents.iter_mut().find(|d| &d.id == id) {
            Some(existing) => *existing = summary,
            None => self.documents.push(summary),
        }
        Ok(())
    }

    fn delete(&mut self, id: &DocumentId) -> Result<()> {
        self.remove(id)
    }
}
