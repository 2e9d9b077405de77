//! Extraction operation reporting.

use std::time::Duration;

use crate::ExtractionError;
use crate::Result;

/// How the destination contents were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Input was not a ZIP container and was copied verbatim.
    RawCopy,
    /// Delegated bulk extraction.
    #[default]
    Primary,
    /// Entry-by-entry extraction with remapping and sanitization.
    Safe,
}

impl Strategy {
    /// Short lowercase name for display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RawCopy => "raw-copy",
            Self::Primary => "primary",
            Self::Safe => "safe",
        }
    }
}

/// Report of one extraction call.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Strategy that produced the destination contents.
    pub strategy: Strategy,

    /// Number of regular files in the destination.
    pub files_extracted: usize,

    /// Bytes written by the safe strategy or raw copy. The bulk extractor
    /// does not report sizes, so this stays 0 for [`Strategy::Primary`].
    pub bytes_written: u64,

    /// Number of files that other entries use as a directory.
    pub conflicts_found: usize,

    /// Entries relocated into the quarantine subtree.
    pub entries_remapped: usize,

    /// Entries whose traversal segments were neutralized.
    pub entries_sanitized: usize,

    /// Entries whose names reduced to nothing.
    pub entries_skipped: usize,

    /// Whether a wrapper directory named after the archive was flattened.
    pub wrapper_flattened: bool,

    /// Error reported by the bulk extractor before falling back.
    pub primary_error: Option<String>,

    /// Duration of the extraction call.
    pub duration: Duration,

    /// Warnings generated during extraction.
    pub warnings: Vec<String>,
}

impl ExtractionReport {
    /// Creates a new empty extraction report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, message: String) {
        self.warnings.push(message);
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns whether the primary strategy was tried and abandoned.
    #[must_use]
    pub fn fell_back(&self) -> bool {
        self.strategy == Strategy::Safe && self.primary_error.is_some()
    }
}

/// Result of one extraction attempt, reduced to what a pipeline needs to
/// decide whether to continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// Destination is usable.
    Success {
        /// Number of files in the destination.
        files: usize,
    },
    /// Archive is unanalyzable with this extraction.
    Failure {
        /// Reason surfaced to the caller.
        reason: String,
    },
}

impl ExtractionOutcome {
    /// Returns `true` for [`ExtractionOutcome::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl From<&Result<ExtractionReport>> for ExtractionOutcome {
    fn from(result: &Result<ExtractionReport>) -> Self {
        match result {
            Ok(report) => Self::Success {
                files: report.files_extracted,
            },
            Err(err) => Self::Failure {
                reason: err.failure_reason(),
            },
        }
    }
}

impl From<&ExtractionError> for ExtractionOutcome {
    fn from(err: &ExtractionError) -> Self {
        Self::Failure {
            reason: err.failure_reason(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_new_report() {
        let report = ExtractionReport::new();
        assert_eq!(report.files_extracted, 0);
        assert_eq!(report.bytes_written, 0);
        assert!(!report.has_warnings());
        assert!(!report.fell_back());
    }

    #[test]
    fn test_add_warning() {
        let mut report = ExtractionReport::new();
        report.add_warning("Test warning".to_string());
        assert!(report.has_warnings());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_fell_back() {
        let report = ExtractionReport {
            strategy: Strategy::Safe,
            primary_error: Some("boom".into()),
            ..Default::default()
        };
        assert!(report.fell_back());
    }

    #[test]
    fn test_outcome_from_result() {
        let ok: Result<ExtractionReport> = Ok(ExtractionReport {
            files_extracted: 4,
            ..Default::default()
        });
        assert_eq!(ExtractionOutcome::from(&ok), ExtractionOutcome::Success { files: 4 });

        let err: Result<ExtractionReport> = Err(ExtractionError::EmptyExtraction {
            path: PathBuf::from("a.apk"),
        });
        let outcome = ExtractionOutcome::from(&err);
        assert!(!outcome.is_success());
        assert_eq!(
            outcome,
            ExtractionOutcome::Failure {
                reason: "no files extracted".into()
            }
        );
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(Strategy::RawCopy.as_str(), "raw-copy");
        assert_eq!(Strategy::Primary.as_str(), "primary");
        assert_eq!(Strategy::Safe.as_str(), "safe");
    }
}
