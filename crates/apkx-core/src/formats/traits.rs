//! Seams between the executor and the archive parsing library.

use std::io::Write;
use std::path::Path;

use crate::Result;
use crate::types::EntryName;

/// Random access to the entries of one opened archive.
pub trait EntrySource {
    /// Returns every entry name in archive order, duplicates included.
    ///
    /// # Errors
    ///
    /// Returns an error if the name table cannot be parsed.
    fn list_entries(&mut self) -> Result<Vec<EntryName>>;

    /// Reads the full contents of one entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is missing or cannot be decoded.
    fn read_entry(&mut self, name: &EntryName) -> Result<Vec<u8>>;

    /// Streams one entry into `writer`, returning the number of bytes
    /// written.
    ///
    /// The default implementation buffers the entry through
    /// [`read_entry`](Self::read_entry).
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be decoded or written.
    fn copy_entry(&mut self, name: &EntryName, writer: &mut dyn Write) -> Result<u64> {
        let bytes = self.read_entry(name)?;
        writer.write_all(&bytes)?;
        Ok(bytes.len() as u64)
    }
}

/// Status reported by a bulk extractor that returned normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkStatus {
    /// Explicit numeric status.
    Code(i32),
    /// The extractor returned without a status.
    Unreported,
}

impl BulkStatus {
    /// Returns whether the status counts as success.
    ///
    /// `0`, `2` and an absent status are success; `2` means partial
    /// success with warnings.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Unreported | Self::Code(0 | 2))
    }

    /// Returns the numeric code, if one was reported.
    #[must_use]
    pub const fn code(self) -> Option<i32> {
        match self {
            Self::Code(code) => Some(code),
            Self::Unreported => None,
        }
    }
}

impl From<Option<i32>> for BulkStatus {
    fn from(code: Option<i32>) -> Self {
        code.map_or(Self::Unreported, Self::Code)
    }
}

/// Archive parsing library behind the extractor.
///
/// Supplies the name-table/entry reader used for conflict detection and
/// safe extraction, and the bulk extractor used as the primary strategy.
pub trait ArchiveBackend {
    /// Entry reader type.
    type Source: EntrySource;

    /// Opens the archive for per-entry access.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be opened or parsed.
    fn open_entries(&mut self, archive: &Path) -> Result<Self::Source>;

    /// Extracts the whole archive below `destination`, possibly into a
    /// wrapper directory named `label`.
    ///
    /// Entry names are not validated by the executor beforehand. An `Err`
    /// makes the executor fall back to safe extraction; an `Ok` with a
    /// non-success status is fatal.
    ///
    /// # Errors
    ///
    /// Returns an error if extraction fails.
    fn extract_all(&mut self, archive: &Path, destination: &Path, label: &str) -> Result<BulkStatus>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct Fixed(Vec<(EntryName, Vec<u8>)>);

    impl EntrySource for Fixed {
        fn list_entries(&mut self) -> Result<Vec<EntryName>> {
            Ok(self.0.iter().map(|(name, _)| name.clone()).collect())
        }

        fn read_entry(&mut self, name: &EntryName) -> Result<Vec<u8>> {
            Ok(self
                .0
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, data)| data.clone())
                .unwrap_or_default())
        }
    }

    #[test]
    fn test_default_copy_entry() {
        let mut source = Fixed(vec![(EntryName::from("a.txt"), b"hello".to_vec())]);
        let mut out = Vec::new();
        let written = source
            .copy_entry(&EntryName::from("a.txt"), &mut out)
            .unwrap();
        assert_eq!(written, 5);
        assert_eq!(out, b"hello");
    }

    #[test]
    fn test_bulk_status_success_codes() {
        assert!(BulkStatus::Code(0).is_success());
        assert!(BulkStatus::Code(2).is_success());
        assert!(BulkStatus::Unreported.is_success());
        assert!(!BulkStatus::Code(1).is_success());
        assert!(!BulkStatus::Code(-1).is_success());
    }

    #[test]
    fn test_bulk_status_from_option() {
        assert_eq!(BulkStatus::from(Some(3)), BulkStatus::Code(3));
        assert_eq!(BulkStatus::from(None), BulkStatus::Unreported);
        assert_eq!(BulkStatus::Code(3).code(), Some(3));
        assert_eq!(BulkStatus::Unreported.code(), None);
    }
}
