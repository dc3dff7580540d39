use std::collections::HashMap;

use super::{DocumentStore, sort_summaries};
use crate::document::{Document, DocumentId, DocumentSummary};
use crate::error::{Error, Result};

/// In-process store keeping each record as its serialized JSON.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: HashMap<DocumentId, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Raw serialized record, as written.
    pub fn raw(&self, id: &DocumentId) -> Option<&str> {
        self.records.get(id).map(String::as_str)
    }
}

impl DocumentStore for MemoryStore {
    fn list(&self) -> Result<Vec<DocumentSummary>> {
        let mut summaries = self
            .records
            .values()
            .map(|json| serde_json::from_str(json).map_err(Error::from))
            .collect::<Result<Vec<DocumentSummary>>>()?;
        sort_summaries(&mut summaries);
        Ok(summaries)
    }

    fn read(&self, id: &DocumentId) -> Result<Document> {
        let json = self
            .records
            .get(id)
            .ok_or_else(|| Error::NotFound(id.clone()))?;
        Ok(serde_json::from_str(json)?)
    }

    fn write(&mut self, id: &DocumentId, doc: &Document) -> Result<()> {
        let json = serde_json::to_string(doc)?;
        self.records.insert(id.clone(), json);
        Ok(())
    }

    fn delete(&mut self, id: &DocumentId) -> Result<()> {
        self.records
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(id.clone()))
    }
}
