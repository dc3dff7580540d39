use std::fs;
use std::io;
use std::path::PathBuf;

use crate::document::{DocumentFormat, DocumentId};

/// Durable storage for the original bytes of imported files.
pub trait SourceStore {
    /// Store `data` for `id` and return where it was written.
    fn write_source(&mut self, id: &DocumentId, format: DocumentFormat, data: &[u8])
    -> io::Result<String>;
}

/// Writes sources to `<root>/documents/<id>.<format>`.
#[derive(Debug, Clone)]
pub struct DirSourceStore {
    root: PathBuf,
}

impl DirSourceStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceStore for DirSourceStore {
    fn write_source(
        &mut self,
        id: &DocumentId,
        format: DocumentFormat,
        data: &[u8],
    ) -> io::Result<String> {
        let dir = self.root.join("documents");
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{}.{}", id, format.extension()));
        fs::write(&path, data)?;
        Ok(path.to_string_lossy().into_owned())
    }
}
