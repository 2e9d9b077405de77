//! JSON output formatter for machine-readable results.

use super::formatter::DigestOutput;
use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use apkx_core::ArchiveDigests;
use apkx_core::ExtractionReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct ExtractionOutput {
    output_dir: String,
    strategy: &'static str,
    files_extracted: usize,
    bytes_written: u64,
    conflicts_found: usize,
    entries_remapped: usize,
    entries_sanitized: usize,
    entries_skipped: usize,
    wrapper_flattened: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    primary_error: Option<String>,
    duration_ms: u128,
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    digests: Option<DigestOutput>,
}

impl ExtractionOutput {
    fn new(output_dir: &Path, report: &ExtractionReport, digests: Option<&ArchiveDigests>) -> Self {
        Self {
            output_dir: output_dir.display().to_string(),
            strategy: report.strategy.as_str(),
            files_extracted: report.files_extracted,
            bytes_written: report.bytes_written,
            conflicts_found: report.conflicts_found,
            entries_remapped: report.entries_remapped,
            entries_sanitized: report.entries_sanitized,
            entries_skipped: report.entries_skipped,
            wrapper_flattened: report.wrapper_flattened,
            primary_error: report.primary_error.clone(),
            duration_ms: report.duration.as_millis(),
            warnings: report.warnings.clone(),
            digests: digests.map(DigestOutput::from),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_extraction_result(
        &self,
        output_dir: &Path,
        report: &ExtractionReport,
        digests: Option<&ArchiveDigests>,
    ) -> Result<()> {
        let data = ExtractionOutput::new(output_dir, report, digests);
        Self::output(&JsonOutput::success("extract", data))
    }

    fn format_digests(&self, path: &Path, digests: &ArchiveDigests) -> Result<()> {
        #[derive(Serialize)]
        struct HashOutput {
            path: String,
            #[serde(flatten)]
            digests: DigestOutput,
        }

        let data = HashOutput {
            path: path.display().to_string(),
            digests: DigestOutput::from(digests),
        };
        Self::output(&JsonOutput::success("hash", data))
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error("unknown", format!("{error:?}"));
        let _ = Self::output(&output);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use apkx_core::Strategy;

    #[test]
    fn test_extraction_output_fields() {
        let report = ExtractionReport {
            strategy: Strategy::Safe,
            files_extracted: 3,
            conflicts_found: 1,
            entries_remapped: 1,
            ..Default::default()
        };
        let data = ExtractionOutput::new(Path::new("out"), &report, None);
        let value = serde_json::to_value(JsonOutput::success("extract", data)).unwrap();

        assert_eq!(value["status"], "success");
        assert_eq!(value["data"]["strategy"], "safe");
        assert_eq!(value["data"]["files_extracted"], 3);
        assert!(value["data"].get("digests").is_none());
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_error_output() {
        let value = serde_json::to_value(JsonOutput::<()>::error("unknown", "boom")).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"], "boom");
        assert!(value.get("data").is_none());
    }
}
