//! Output formatter trait for CLI results.

use anyhow::Result;
use apkx_core::ArchiveDigests;
use apkx_core::ExtractionReport;
use serde::Serialize;
use std::path::Path;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format extraction result
    fn format_extraction_result(
        &self,
        output_dir: &Path,
        report: &ExtractionReport,
        digests: Option<&ArchiveDigests>,
    ) -> Result<()>;

    /// Format file digests
    fn format_digests(&self, path: &Path, digests: &ArchiveDigests) -> Result<()>;

    /// Format error message
    fn format_error(&self, error: &anyhow::Error);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }
}

impl JsonOutput<()> {
    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Serializable view of [`ArchiveDigests`].
#[derive(Debug, Serialize)]
pub struct DigestOutput {
    pub md5: String,
    pub sha1: String,
    pub sha256: String,
}

impl From<&ArchiveDigests> for DigestOutput {
    fn from(digests: &ArchiveDigests) -> Self {
        Self {
            md5: digests.md5.clone(),
            sha1: digests.sha1.clone(),
            sha256: digests.sha256.clone(),
        }
    }
}
