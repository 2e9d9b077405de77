//! Error conversion utilities for CLI.
//!
//! Converts apkx-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use apkx_core::ExtractionError;
use std::path::Path;

/// Converts `ExtractionError` to user-friendly anyhow error with context
pub fn convert_extraction_error(err: ExtractionError, archive: &Path) -> anyhow::Error {
    match err {
        ExtractionError::Io(io_err) => {
            anyhow!("I/O error while processing '{}': {}", archive.display(), io_err)
        }
        ExtractionError::InvalidArchive(reason) => {
            anyhow!(
                "Invalid archive '{}': {}\n\
                 HINT: The archive may be corrupted or malformed.",
                archive.display(),
                reason
            )
        }
        ExtractionError::EntryRead { name, reason } => {
            anyhow!(
                "Failed to read entry '{}' from '{}': {}\n\
                 HINT: The entry may be encrypted, truncated or use an unsupported compression method.",
                name,
                archive.display(),
                reason
            )
        }
        ExtractionError::EmptyExtraction { .. } => {
            anyhow!(
                "No files extracted from '{}'\n\
                 HINT: The archive holds no regular files and cannot be analyzed.",
                archive.display()
            )
        }
        ExtractionError::UnexpectedStatus { code } => {
            anyhow!(
                "Extraction of '{}' ended with unexpected status code {}",
                archive.display(),
                code
            )
        }
        ExtractionError::InvalidConfig { reason } => {
            anyhow!(
                "Invalid configuration: {}\n\
                 HINT: --quarantine-dir and --parent-placeholder take a single plain name, \
                 and OUTPUT_DIR must not contain the archive.",
                reason
            )
        }
    }
}

/// Adds context to a generic error about archive operations
pub fn add_archive_context<T>(result: Result<T, ExtractionError>, archive: &Path) -> anyhow::Result<T> {
    result.map_err(|e| convert_extraction_error(e, archive))
}
