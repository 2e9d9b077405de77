//! ZIP backend built on the `zip` crate.

use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use std::io::Write;
use std::path::Path;

use super::traits::ArchiveBackend;
use super::traits::BulkStatus;
use super::traits::EntrySource;
use crate::ExtractionError;
use crate::Result;
use crate::types::EntryName;

/// Per-entry reader over a ZIP central directory.
pub struct ZipEntrySource<R> {
    archive: zip::ZipArchive<R>,
}

impl ZipEntrySource<BufReader<File>> {
    /// Opens a ZIP file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the central
    /// directory cannot be parsed.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> ZipEntrySource<R> {
    /// Parses the central directory of `reader`.
    ///
    /// # Errors
    ///
    /// Returns an error if the central directory cannot be parsed.
    pub fn new(reader: R) -> Result<Self> {
        let archive = zip::ZipArchive::new(reader)?;
        Ok(Self { archive })
    }

    /// Number of entries in the central directory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Returns `true` if the archive has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }
}

impl<R: Read + Seek> EntrySource for ZipEntrySource<R> {
    fn list_entries(&mut self) -> Result<Vec<EntryName>> {
        (0..self.archive.len())
            .map(|index| {
                let entry = self.archive.by_index_raw(index)?;
                Ok(EntryName::from(entry.name()))
            })
            .collect()
    }

    fn read_entry(&mut self, name: &EntryName) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.copy_entry(name, &mut buffer)?;
        Ok(buffer)
    }

    fn copy_entry(&mut self, name: &EntryName, writer: &mut dyn Write) -> Result<u64> {
        let mut entry = self
            .archive
            .by_name(name.as_str())
            .map_err(|e| ExtractionError::EntryRead {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        let written = std::io::copy(&mut entry, writer)?;
        Ok(written)
    }
}

/// Backend that reads and bulk-extracts ZIP containers with the `zip` crate.
///
/// The bulk extractor writes into `destination/label`, so the executor's
/// wrapper flattening applies to every successful primary extraction.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipBackend;

impl ZipBackend {
    /// Creates the backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ArchiveBackend for ZipBackend {
    type Source = ZipEntrySource<BufReader<File>>;

    fn open_entries(&mut self, archive: &Path) -> Result<Self::Source> {
        ZipEntrySource::open(archive)
    }

    fn extract_all(&mut self, archive: &Path, destination: &Path, label: &str) -> Result<BulkStatus> {
        let target = if label.is_empty() {
            destination.to_path_buf()
        } else {
            destination.join(label)
        };

        let mut zip = zip::ZipArchive::new(BufReader::new(File::open(archive)?))?;
        fs::create_dir_all(&target)?;
        zip.extract(&target)?;
        Ok(BulkStatus::Code(0))
    }
}
