//! Archive access for container formats.
//!
//! The EPUB tokenizer only needs to list entries and read one entry by
//! path, so that is all [`Archive`] exposes. [`ZipEntries`] implements it
//! over an in-memory zip file with random access to each entry;
//! [`MemoryArchive`] is a plain map for hosts that unpack archives
//! themselves.

use std::collections::{BTreeMap, HashMap};
use std::io::{self, Cursor, Read};

use zip::ZipArchive;

use crate::util::decode_markup;

/// Read-only view of a container's entries.
pub trait Archive {
    /// All entry paths, in archive order.
    fn entry_names(&self) -> Vec<&str>;

    /// Whether an entry exists at `path`.
    fn contains(&self, path: &str) -> bool;

    /// Read and decompress an entry.
    fn read_entry(&self, path: &str) -> io::Result<Vec<u8>>;

    /// Read an entry as text, honoring an XML encoding declaration.
    fn read_text(&self, path: &str) -> io::Result<String> {
        let bytes = self.read_entry(path)?;
        Ok(decode_markup(&bytes).into_owned())
    }
}

#[derive(Clone, Copy)]
struct ZipEntryLoc {
    /// Offset to the compressed data within the zip file.
    data_offset: u64,
    /// Size of the compressed data.
    compressed_size: u64,
    /// Compression method (0 = Store, 8 = Deflate).
    compression: u16,
}

/// Zip archive held in memory, indexed once at open.
pub struct ZipEntries<'a> {
    data: &'a [u8],
    index: HashMap<String, ZipEntryLoc>,
    names: Vec<String>,
}

impl<'a> ZipEntries<'a> {
    /// Scan the central directory of `data`.
    pub fn new(data: &'a [u8]) -> zip::result::ZipResult<Self> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;

        let mut index = HashMap::new();
        let mut names = Vec::new();

        for i in 0..archive.len() {
            let file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();

            index.insert(
                name.clone(),
                ZipEntryLoc {
                    data_offset: file.data_start(),
                    compressed_size: file.compressed_size(),
                    compression: compression_to_u16(file.compression()),
                },
            );
            names.push(name);
        }

        Ok(Self { data, index, names })
    }
}

impl Archive for ZipEntries<'_> {
    fn entry_names(&self) -> Vec<&str> {
        self.names.iter().map(String::as_str).collect()
    }

    fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    fn read_entry(&self, path: &str) -> io::Result<Vec<u8>> {
        let loc = self.index.get(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found in ZIP: {}", path),
            )
        })?;

        let start = usize::try_from(loc.data_offset).map_err(io::Error::other)?;
        let len = usize::try_from(loc.compressed_size).map_err(io::Error::other)?;
        let compressed = start
            .checked_add(len)
            .and_then(|end| self.data.get(start..end))
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "truncated zip entry"))?;

        match loc.compression {
            0 => Ok(compressed.to_vec()),
            8 => {
                let mut decoder = flate2::read::DeflateDecoder::new(compressed);
                let mut out = Vec::new();
                decoder.read_to_end(&mut out)?;
                Ok(out)
            }
            method => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("Unsupported compression method: {}", method),
            )),
        }
    }
}

fn compression_to_u16(method: zip::CompressionMethod) -> u16 {
    match method {
        zip::CompressionMethod::Stored => 0,
        zip::CompressionMethod::Deflated => 8,
        _ => 255,
    }
}

/// Archive backed by a map of path to bytes.
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.entries.insert(path.into(), data.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_entry(mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(path, data);
        self
    }
}

impl Archive for MemoryArchive {
    fn entry_names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    fn read_entry(&self, path: &str) -> io::Result<Vec<u8>> {
        self.entries.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found in archive: {}", path),
            )
        })
    }
}
