//! Test utilities: in-memory ZIP fixtures, a scripted backend and a
//! recording event sink.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::fs;
use std::io::Cursor;
use std::io::Write;
use std::path::Path;

use crate::ExtractionError;
use crate::Result;
use crate::config::DEFAULT_PARENT_PLACEHOLDER;
use crate::events::EventSink;
use crate::events::ExtractionEvent;
use crate::events::Phase;
use crate::formats::ArchiveBackend;
use crate::formats::BulkStatus;
use crate::formats::EntrySource;
use crate::types::EntryName;
use crate::types::SafePath;

/// Creates an in-memory ZIP archive from a list of entries.
///
/// Each entry is a tuple of (name, content). Names ending in `/` become
/// directory entries. Files are stored uncompressed with mode 0o644.
/// Names are written verbatim, so traversal and conflict fixtures can be
/// built with it.
///
/// # Examples
///
/// ```
/// use apkx_core::test_utils::create_test_zip;
///
/// let zip_data = create_test_zip(&[("res/", ""), ("res/a.txt", "hello")]);
/// assert_eq!(&zip_data[..4], b"PK\x03\x04");
/// ```
#[must_use]
pub fn create_test_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    entries
        .iter()
        .fold(ZipTestBuilder::new(), |builder, (name, data)| {
            if name.ends_with('/') {
                builder.add_directory(name)
            } else {
                builder.add_file(name, data.as_bytes())
            }
        })
        .build()
}

/// Writes a ZIP archive built from `entries` to `path`.
pub fn write_test_zip(path: &Path, entries: &[(&str, &str)]) {
    fs::write(path, create_test_zip(entries)).unwrap();
}

/// Builder for ZIP test archives with binary contents.
///
/// # Examples
///
/// ```
/// use apkx_core::test_utils::ZipTestBuilder;
///
/// let zip_data = ZipTestBuilder::new()
///     .add_file("classes.dex", b"dex\n035\0")
///     .add_directory("lib/")
///     .build();
/// ```
pub struct ZipTestBuilder {
    writer: zip::ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipTestBuilder {
    /// Creates a new ZIP test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            writer: zip::ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    fn options() -> zip::write::SimpleFileOptions {
        zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored)
            .unix_permissions(0o644)
    }

    /// Adds a regular file entry.
    #[must_use]
    pub fn add_file(mut self, name: &str, data: &[u8]) -> Self {
        self.writer.start_file(name, Self::options()).unwrap();
        self.writer.write_all(data).unwrap();
        self
    }

    /// Adds a directory entry.
    #[must_use]
    pub fn add_directory(mut self, name: &str) -> Self {
        self.writer.add_directory(name, Self::options()).unwrap();
        self
    }

    /// Finishes the archive and returns its bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.writer.finish().unwrap().into_inner()
    }
}

impl Default for ZipTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Scripted behavior of [`MemoryBackend::extract_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkBehavior {
    /// Writes every file entry below `destination/label`, then returns the
    /// status.
    Extract(BulkStatus),
    /// Writes every file entry directly below `destination`.
    ExtractFlat(BulkStatus),
    /// Writes nothing and returns the status.
    Status(BulkStatus),
    /// Returns an error with this message.
    Fail(String),
}

/// Backend serving a fixed entry list, with scripted bulk extraction.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    entries: Vec<(String, Vec<u8>)>,
    bulk: BulkBehavior,
    unreadable: bool,
    bulk_calls: usize,
    open_calls: usize,
}

impl MemoryBackend {
    /// Creates a backend whose bulk extractor writes into the wrapper
    /// directory and reports status 0.
    #[must_use]
    pub fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(name, data)| ((*name).to_string(), data.as_bytes().to_vec()))
                .collect(),
            bulk: BulkBehavior::Extract(BulkStatus::Code(0)),
            unreadable: false,
            bulk_calls: 0,
            open_calls: 0,
        }
    }

    /// Sets the bulk extraction behavior.
    #[must_use]
    pub fn with_bulk(mut self, bulk: BulkBehavior) -> Self {
        self.bulk = bulk;
        self
    }

    /// Makes every attempt to open the name table fail.
    #[must_use]
    pub fn with_unreadable_names(mut self) -> Self {
        self.unreadable = true;
        self
    }

    /// Number of times the bulk extractor was invoked.
    #[must_use]
    pub fn bulk_calls(&self) -> usize {
        self.bulk_calls
    }

    /// Number of times the name table was opened.
    #[must_use]
    pub fn open_calls(&self) -> usize {
        self.open_calls
    }

    fn write_entries(&self, root: &Path) -> Result<()> {
        for (name, data) in &self.entries {
            if !EntryName::from(name.as_str()).is_file() {
                continue;
            }
            let Some(safe) = SafePath::sanitize(name, DEFAULT_PARENT_PLACEHOLDER) else {
                continue;
            };
            let path = root.join(safe.as_path());
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, data)?;
        }
        Ok(())
    }
}

impl ArchiveBackend for MemoryBackend {
    type Source = MemorySource;

    fn open_entries(&mut self, _archive: &Path) -> Result<Self::Source> {
        self.open_calls += 1;
        if self.unreadable {
            return Err(ExtractionError::InvalidArchive(
                "could not find central directory end".into(),
            ));
        }
        Ok(MemorySource {
            entries: self.entries.clone(),
        })
    }

    fn extract_all(&mut self, _archive: &Path, destination: &Path, label: &str) -> Result<BulkStatus> {
        self.bulk_calls += 1;
        match self.bulk.clone() {
            BulkBehavior::Extract(status) => {
                self.write_entries(&destination.join(label))?;
                Ok(status)
            }
            BulkBehavior::ExtractFlat(status) => {
                self.write_entries(destination)?;
                Ok(status)
            }
            BulkBehavior::Status(status) => Ok(status),
            BulkBehavior::Fail(message) => Err(ExtractionError::InvalidArchive(message)),
        }
    }
}

/// Entry reader over an in-memory entry list.
#[derive(Debug, Clone)]
pub struct MemorySource {
    entries: Vec<(String, Vec<u8>)>,
}

impl EntrySource for MemorySource {
    fn list_entries(&mut self) -> Result<Vec<EntryName>> {
        Ok(self
            .entries
            .iter()
            .map(|(name, _)| EntryName::from(name.as_str()))
            .collect())
    }

    fn read_entry(&mut self, name: &EntryName) -> Result<Vec<u8>> {
        self.entries
            .iter()
            .rev()
            .find(|(n, _)| n == name.as_str())
            .map(|(_, data)| data.clone())
            .ok_or_else(|| ExtractionError::EntryRead {
                name: name.to_string(),
                reason: "no such entry".into(),
            })
    }
}

/// Sink that keeps every event.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    /// Recorded events in order.
    pub events: Vec<ExtractionEvent>,
}

impl RecordingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the sequence of executor states entered.
    #[must_use]
    pub fn phases(&self) -> Vec<Phase> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ExtractionEvent::PhaseEntered(phase) => Some(*phase),
                _ => None,
            })
            .collect()
    }

    /// Returns whether any recorded event satisfies `predicate`.
    pub fn any(&self, predicate: impl Fn(&ExtractionEvent) -> bool) -> bool {
        self.events.iter().any(predicate)
    }
}

impl EventSink for RecordingSink {
    fn record(&mut self, event: &ExtractionEvent) {
        self.events.push(event.clone());
    }
}
