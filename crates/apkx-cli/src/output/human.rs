//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use apkx_core::ArchiveDigests;
use apkx_core::ExtractionReport;
use console::Term;
use console::style;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }

    fn write_digests(&self, digests: &ArchiveDigests) {
        self.line(&format!("  MD5:     {}", digests.md5));
        self.line(&format!("  SHA-1:   {}", digests.sha1));
        self.line(&format!("  SHA-256: {}", digests.sha256));
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_extraction_result(
        &self,
        output_dir: &Path,
        report: &ExtractionReport,
        digests: Option<&ArchiveDigests>,
    ) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let header = format!("Extraction complete: {}", output_dir.display());
        if self.use_colors {
            self.line(&format!("{} {header}", style("✓").green().bold()));
        } else {
            self.line(&header);
        }

        self.line(&format!("  Strategy:        {}", report.strategy.as_str()));
        self.line(&format!("  Files extracted: {}", report.files_extracted));
        if report.bytes_written > 0 {
            self.line(&format!(
                "  Total size:      {}",
                Self::format_size(report.bytes_written)
            ));
        }
        if report.conflicts_found > 0 {
            self.line(&format!(
                "  Conflicts:       {} ({} entries relocated)",
                report.conflicts_found, report.entries_remapped
            ));
        }
        if report.entries_sanitized > 0 {
            self.line(&format!("  Sanitized:       {}", report.entries_sanitized));
        }
        if report.entries_skipped > 0 {
            self.line(&format!("  Skipped:         {}", report.entries_skipped));
        }

        if self.verbose {
            self.line(&format!("  Wrapper flattened: {}", report.wrapper_flattened));
            self.line(&format!("  Duration: {:?}", report.duration));
        }

        if let Some(digests) = digests {
            self.write_digests(digests);
        }

        if report.has_warnings() {
            self.line("");
            if self.use_colors {
                self.line(&format!("{}", style("Warnings:").yellow().bold()));
            } else {
                self.line("Warnings:");
            }
            for warning in &report.warnings {
                self.line(&format!("  - {warning}"));
            }
        }

        Ok(())
    }

    fn format_digests(&self, path: &Path, digests: &ArchiveDigests) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.line(&path.display().to_string());
        self.write_digests(digests);
        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = term.write_line(&format!("ERROR: {error:?}"));
        }
    }
}
