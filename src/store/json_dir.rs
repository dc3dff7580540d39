use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{DocumentStore, sort_summaries};
use crate::document::{Document, DocumentId, DocumentSummary};
use crate::error::{Error, Result};

const RECORD_EXTENSION: &str = "json";

/// Directory holding one `<id>.json` file per document.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, id: &DocumentId) -> PathBuf {
        self.root
            .join(format!("{}.{}", sanitize(id.as_str()), RECORD_EXTENSION))
    }

    fn not_found(id: &DocumentId, e: io::Error) -> Error {
        if e.kind() == io::ErrorKind::NotFound {
            Error::NotFound(id.clone())
        } else {
            Error::Io(e)
        }
    }
}

/// Keep ids from escaping the store directory.
fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

impl DocumentStore for JsonDirStore {
    fn list(&self) -> Result<Vec<DocumentSummary>> {
        let mut summaries = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            let data = fs::read(&path)?;
            match serde_json::from_slice::<DocumentSummary>(&data) {
                Ok(summary) => summaries.push(summary),
                Err(e) => log::warn!("Skipping unreadable record {}: {}", path.display(), e),
            }
        }
        sort_summaries(&mut summaries);
        Ok(summaries)
    }

    fn read(&self, id: &DocumentId) -> Result<Document> {
        let data = fs::read(self.record_path(id)).map_err(|e| Self::not_found(id, e))?;
        Ok(serde_json::from_slice(&data)?)
    }

    fn write(&mut self, id: &DocumentId, doc: &Document) -> Result<()> {
        let path = self.record_path(id);
        let tmp = path.with_extension("json.tmp");
        let payload = serde_json::to_vec(doc)?;

        let mut file = File::create(&tmp)?;
        file.write_all(&payload)?;
        file.sync_all()?;
        drop(file);

        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        log::trace!("Wrote {} ({} bytes)", path.display(), payload.len());
        Ok(())
    }

    fn delete(&mut self, id: &DocumentId) -> Result<()> {
        fs::remove_file(self.record_path(id)).map_err(|e| Self::not_found(id, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentFormat;
    use crate::tokenize::tokenize_text;

    #[test]
    fn test_write_read_delete() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonDirStore::open(dir.path()).unwrap();

        let mut doc = Document::new(
            DocumentId::new("k3x9"),
            "notes.txt",
            DocumentFormat::Txt,
            tokenize_text("one two three"),
            42,
        );
        store.write(&doc.id, &doc).unwrap();
        assert!(dir.path().join("k3x9.json").exists());
        assert!(!dir.path().join("k3x9.json.tmp").exists());

        doc.last_read_position = 2;
        store.write(&doc.id, &doc).unwrap();
        assert_eq!(store.read(&doc.id).unwrap(), doc);
        assert_eq!(store.list().unwrap()[0].last_read_position, 2);

        store.delete(&doc.id).unwrap();
        assert!(matches!(store.read(&doc.id), Err(Error::NotFound(_))));
        assert!(matches!(store.delete(&doc.id), Err(Error::NotFound(_))));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_skips_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.md"), "not a record").unwrap();
        fs::write(dir.path().join("broken.json"), "{").unwrap();
        let store = JsonDirStore::open(dir.path()).unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_ids_cannot_escape_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::open(dir.path().join("records")).unwrap();
        let path = store.record_path(&DocumentId::new("../../etc/passwd"));
        assert_eq!(path.parent(), Some(store.root()));
    }
}
