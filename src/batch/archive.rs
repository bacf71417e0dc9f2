use std::collections::HashMap;
use std::io::{Cursor, Write};

use crate::foundation::error::{CertstampError, CertstampResult};

/// Archive MIME type.
pub const ZIP_MIME_TYPE: &str = "application/zip";

/// What [`ArchiveSink::add_file`] did with an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryWrite {
    /// New entry name.
    Added,
    /// An entry with this name existed; its contents were replaced (last write wins).
    Replaced,
}

/// Destination for per-entry files of one batch run.
///
/// Ordering contract: entries keep the position of their first insertion; re-adding a name
/// replaces the bytes in place. `finalize` is called exactly once, after the last `add_file`.
pub trait ArchiveSink {
    /// Store `bytes` under `name`.
    fn add_file(&mut self, name: &str, bytes: Vec<u8>) -> CertstampResult<EntryWrite>;
    /// Produce the finished archive bytes.
    fn finalize(&mut self) -> CertstampResult<Vec<u8>>;
    /// MIME type of the finalized bytes.
    fn mime_type(&self) -> &'static str {
        ZIP_MIME_TYPE
    }
}

#[derive(Debug, Default)]
struct EntryTable {
    entries: Vec<(String, Vec<u8>)>,
    index: HashMap<String, usize>,
}

impl EntryTable {
    fn insert(&mut self, name: &str, bytes: Vec<u8>) -> EntryWrite {
        if let Some(&i) = self.index.get(name) {
            self.entries[i].1 = bytes;
            return EntryWrite::Replaced;
        }
        self.index.insert(name.to_owned(), self.entries.len());
        self.entries.push((name.to_owned(), bytes));
        EntryWrite::Added
    }
}

/// In-memory sink for tests and debugging.
///
/// `finalize` returns a text manifest (`<name> <len>` per line); the entries themselves stay
/// available through [`InMemoryArchive::entries`].
#[derive(Debug, Default)]
pub struct InMemoryArchive {
    table: EntryTable,
    finalized: bool,
}

impl InMemoryArchive {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries in archive order.
    pub fn entries(&self) -> &[(String, Vec<u8>)] {
        &self.table.entries
    }

    /// Whether `finalize` has run.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }
}

impl ArchiveSink for InMemoryArchive {
    fn add_file(&mut self, name: &str, bytes: Vec<u8>) -> CertstampResult<EntryWrite> {
        if self.finalized {
            return Err(CertstampError::archive("add_file after finalize"));
        }
        Ok(self.table.insert(name, bytes))
    }

    fn finalize(&mut self) -> CertstampResult<Vec<u8>> {
        if self.finalized {
            return Err(CertstampError::archive("archive already finalized"));
        }
        self.finalized = true;
        let mut manifest = String::new();
        for (name, bytes) in &self.table.entries {
            manifest.push_str(&format!("{name} {}\n", bytes.len()));
        }
        Ok(manifest.into_bytes())
    }

    fn mime_type(&self) -> &'static str {
        "text/plain"
    }
}

/// Deflate-compressed zip archive built in memory.
///
/// Entries are buffered and written once at `finalize` with a fixed timestamp, so identical
/// inputs produce identical archives.
#[derive(Debug, Default)]
pub struct ZipArchive {
    table: EntryTable,
    finalized: bool,
}

impl ZipArchive {
    /// Create an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries buffered so far.
    pub fn len(&self) -> usize {
        self.table.entries.len()
    }

    /// `true` when no entries have been added.
    pub fn is_empty(&self) -> bool {
        self.table.entries.is_empty()
    }
}

impl ArchiveSink for ZipArchive {
    fn add_file(&mut self, name: &str, bytes: Vec<u8>) -> CertstampResult<EntryWrite> {
        if self.finalized {
            return Err(CertstampError::archive("add_file after finalize"));
        }
        Ok(self.table.insert(name, bytes))
    }

    #[tracing::instrument(level = "debug", skip(self), fields(entries = self.table.entries.len()))]
    fn finalize(&mut self) -> CertstampResult<Vec<u8>> {
        if self.finalized {
            return Err(CertstampError::archive("archive already finalized"));
        }
        self.finalized = true;

        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, bytes) in &self.table.entries {
            writer
                .start_file(name.as_str(), options)
                .map_err(|e| CertstampError::archive(format!("zip entry '{name}': {e}")))?;
            writer
                .write_all(bytes)
                .map_err(|e| CertstampError::archive(format!("zip entry '{name}': {e}")))?;
        }
        let cursor = writer
            .finish()
            .map_err(|e| CertstampError::archive(format!("zip finish: {e}")))?;
        let out = cursor.into_inner();
        tracing::debug!(bytes = out.len(), "zip archive finalized");
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/batch/archive.rs"]
mod tests;
