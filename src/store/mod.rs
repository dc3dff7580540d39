//! Persistence capabilities for document records and source files.

mod json_dir;
mod memory;
mod source;

pub use json_dir::JsonDirStore;
pub use memory::MemoryStore;
pub use source::{DirSourceStore, SourceStore};

use crate::document::{Document, DocumentId, DocumentSummary};
use crate::error::Result;

/// Key-value store of serialized [`Document`] records.
///
/// Writes replace the whole record. Reading or deleting a missing id is
/// [`Error::NotFound`](crate::Error::NotFound).
pub trait DocumentStore {
    /// Summaries of every stored record, oldest import first.
    fn list(&self) -> Result<Vec<DocumentSummary>>;

    fn read(&self, id: &DocumentId) -> Result<Document>;

    fn write(&mut self, id: &DocumentId, doc: &Document) -> Result<()>;

    fn delete(&mut self, id: &DocumentId) -> Result<()>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for &mut S {
    fn list(&self) -> Result<Vec<DocumentSummary>> {
        (**self).list()
    }

    fn read(&self, id: &DocumentId) -> Result<Document> {
        (**self).read(id)
    }

    fn write(&mut self, id: &DocumentId, doc: &Document) -> Result<()> {
        (**self).write(id, doc)
    }

    fn delete(&mut self, id: &DocumentId) -> Result<()> {
        (**self).delete(id)
    }
}

fn sort_summaries(summaries: &mut [DocumentSummary]) {
    summaries.sort_by(|a, b| a.added_at.cmp(&b.added_at).then_with(|| a.id.cmp(&b.id)));
}
