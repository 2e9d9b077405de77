//! Error types for archive extraction operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ExtractionError`.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Errors that can end an extraction call.
///
/// Only conditions that are fatal for the current call are represented here.
/// Signature mismatches, path conflicts, primary-strategy failures and
/// unsanitizable entries are recovered inside the executor and show up as
/// events and report counters instead.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive has a ZIP signature but its name table or entries cannot be
    /// read.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// An entry could not be read from the archive.
    #[error("failed to read entry '{name}': {reason}")]
    EntryRead {
        /// Raw entry name as recorded in the archive.
        name: String,
        /// Underlying parser message.
        reason: String,
    },

    /// Extraction reported success but the destination holds no files.
    #[error("no files extracted from {path}")]
    EmptyExtraction {
        /// The archive that was being extracted.
        path: PathBuf,
    },

    /// The bulk extractor returned a status code outside the success set.
    #[error("bulk extractor returned unexpected status code {code}")]
    UnexpectedStatus {
        /// The status code that was returned.
        code: i32,
    },

    /// Extraction configuration is not usable.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Why the configuration was rejected.
        reason: String,
    },
}

impl ExtractionError {
    /// Returns the reason string surfaced to callers when the executor ends
    /// in the `Failed` state.
    ///
    /// # Examples
    ///
    /// ```
    /// use apkx_core::ExtractionError;
    /// use std::path::PathBuf;
    ///
    /// let err = ExtractionError::EmptyExtraction {
    ///     path: PathBuf::from("app.apk"),
    /// };
    /// assert_eq!(err.failure_reason(), "no files extracted");
    /// ```
    #[must_use]
    pub fn failure_reason(&self) -> String {
        match self {
            Self::EmptyExtraction { .. } => "no files extracted".to_string(),
            Self::UnexpectedStatus { code } => format!("unexpected status code {code}"),
            other => other.to_string(),
        }
    }

    /// Returns `true` if the error comes from the archive content rather
    /// than from the host environment.
    ///
    /// Callers analysing many archives use this to tell an unanalyzable
    /// sample apart from a broken extraction setup.
    ///
    /// # Examples
    ///
    /// ```
    /// use apkx_core::ExtractionError;
    ///
    /// let err = ExtractionError::InvalidArchive("truncated central directory".into());
    /// assert!(err.is_archive_fault());
    ///
    /// let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    /// assert!(!ExtractionError::Io(io).is_archive_fault());
    /// ```
    #[must_use]
    pub const fn is_archive_fault(&self) -> bool {
        matches!(
            self,
            Self::InvalidArchive(_)
                | Self::EntryRead { .. }
                | Self::EmptyExtraction { .. }
                | Self::UnexpectedStatus { .. }
        )
    }

    /// Returns a context string for this error, if available.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::InvalidArchive(msg) => Some(msg),
            Self::EntryRead { reason, .. } => Some(reason),
            Self::InvalidConfig { reason } => Some(reason),
            _ => None,
        }
    }
}

impl From<zip::result::ZipError> for ExtractionError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(io) => Self::Io(io),
            other => Self::InvalidArchive(other.to_string()),
        }
    }
}
