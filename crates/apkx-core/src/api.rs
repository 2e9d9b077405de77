//! High-level public API for APK extraction.

use std::path::Path;

use crate::ExtractionConfig;
use crate::ExtractionReport;
use crate::Result;
use crate::extraction::Extractor;

/// Extracts an APK (or any ZIP container) into `output_dir`.
///
/// Uses the `zip` crate backend and reports through `tracing`. See
/// [`Extractor`] to inject a different backend or event sink.
///
/// # Arguments
///
/// * `archive_path` - Path to the archive file
/// * `output_dir` - Directory that receives the extracted files; created if
///   missing, previous contents replaced
/// * `config` - Quarantine and sanitization settings
///
/// # Errors
///
/// Returns an error if:
/// - The configuration is invalid
/// - The destination cannot be prepared
/// - The bulk extractor reports success without writing anything, or
///   returns an unexpected status code
/// - The archive cannot be read during safe extraction
/// - I/O operations fail
///
/// # Examples
///
/// ```no_run
/// use apkx_core::ExtractionConfig;
/// use apkx_core::extract_apk;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ExtractionConfig::default();
/// let report = extract_apk("app.apk", "/tmp/app", &config)?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub fn extract_apk<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    output_dir: Q,
    config: &ExtractionConfig,
) -> Result<ExtractionReport> {
    Extractor::new(config.clone()).extract(archive_path, output_dir)
}
