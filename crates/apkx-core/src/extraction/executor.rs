//! Extraction strategy executor.
//!
//! One call walks a small state machine:
//!
//! ```text
//! Init -> SignatureChecked -> ConflictScanned -> PrimaryAttempted -> Done
//!               |                   |                   |
//!               | not a ZIP         | conflicts         | extractor error
//!               v                   v                   v
//!             Done             SafeExtracted <----------+
//!           (raw copy)              |
//!                                   v
//!                                 Done
//! ```
//!
//! Any state may move to `Failed`, which ends the call with the error.

use std::fs;
use std::path::Path;
use std::time::Instant;

use super::flatten::flatten_wrapper;
use super::safe::extract_entries;
use crate::ExtractionConfig;
use crate::ExtractionError;
use crate::Result;
use crate::events::EventSink;
use crate::events::ExtractionEvent;
use crate::events::Phase;
use crate::events::TracingSink;
use crate::formats::ArchiveBackend;
use crate::formats::BulkStatus;
use crate::formats::EntrySource;
use crate::formats::ZipBackend;
use crate::formats::has_zip_signature;
use crate::report::ExtractionReport;
use crate::report::Strategy;
use crate::security::ConflictSet;
use crate::types::DestDir;
use crate::types::EntryName;

/// Extracts APK/ZIP archives with a bulk extractor and a safe fallback.
///
/// The backend and the event sink are injected; [`Extractor::new`] uses
/// [`ZipBackend`] and [`TracingSink`].
///
/// # Examples
///
/// ```no_run
/// use apkx_core::ExtractionConfig;
/// use apkx_core::Extractor;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut extractor = Extractor::new(ExtractionConfig::default());
/// let report = extractor.extract("app.apk", "/tmp/app")?;
/// println!("{} files via {:?}", report.files_extracted, report.strategy);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Extractor<B = ZipBackend, S = TracingSink> {
    config: ExtractionConfig,
    backend: B,
    sink: S,
}

impl Extractor {
    /// Creates an extractor backed by the `zip` crate that logs through
    /// `tracing`.
    #[must_use]
    pub fn new(config: ExtractionConfig) -> Self {
        Self {
            config,
            backend: ZipBackend::new(),
            sink: TracingSink,
        }
    }
}

impl<B, S> Extractor<B, S> {
    /// Replaces the archive backend.
    #[must_use]
    pub fn with_backend<B2>(self, backend: B2) -> Extractor<B2, S> {
        Extractor {
            config: self.config,
            backend,
            sink: self.sink,
        }
    }

    /// Replaces the event sink.
    #[must_use]
    pub fn with_sink<S2>(self, sink: S2) -> Extractor<B, S2> {
        Extractor {
            config: self.config,
            backend: self.backend,
            sink,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Returns the backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the event sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<B: ArchiveBackend, S: EventSink> Extractor<B, S> {
    /// Extracts `archive` into `output_dir`.
    ///
    /// The destination is created if missing and its previous contents are
    /// replaced. Non-ZIP input is copied verbatim. Archives with path
    /// conflicts, or that the bulk extractor rejects, go through
    /// entry-by-entry extraction.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration is invalid or the archive lies inside the
    ///   destination
    /// - The destination cannot be created or written
    /// - The bulk extractor reports success but writes nothing, or returns
    ///   an unexpected status code
    /// - The archive cannot be read during safe extraction
    pub fn extract(&mut self, archive: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Result<ExtractionReport> {
        let start = Instant::now();
        let archive = archive.as_ref();
        self.config.validate()?;

        let dest = DestDir::create(output_dir.as_ref())?;
        if let Ok(canonical) = archive.canonicalize()
            && canonical.starts_with(dest.as_path())
        {
            return Err(ExtractionError::InvalidConfig {
                reason: format!(
                    "archive {} lies inside the destination {}",
                    archive.display(),
                    dest.as_path().display()
                ),
            });
        }

        let run = Run {
            archive,
            label: archive_label(archive),
            dest: &dest,
            config: &self.config,
            backend: &mut self.backend,
            sink: &mut self.sink,
            scan: None,
            report: ExtractionReport::new(),
        };
        let mut report = run.drive()?;
        report.duration = start.elapsed();
        Ok(report)
    }
}

/// Wrapper directory name a bulk extractor uses: the archive file stem.
fn archive_label(archive: &Path) -> String {
    archive
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

enum State {
    Init,
    SignatureChecked { is_zip: bool },
    ConflictScanned,
    PrimaryAttempted(Attempt),
    SafeExtracted,
    Done,
    Failed(ExtractionError),
}

enum Attempt {
    Extracted,
    Abandoned,
}

impl State {
    const fn phase(&self) -> Phase {
        match self {
            Self::Init => Phase::Init,
            Self::SignatureChecked { .. } => Phase::SignatureChecked,
            Self::ConflictScanned => Phase::ConflictScanned,
            Self::PrimaryAttempted(_) => Phase::PrimaryAttempted,
            Self::SafeExtracted => Phase::SafeExtracted,
            Self::Done => Phase::Done,
            Self::Failed(_) => Phase::Failed,
        }
    }
}

struct Scan<E> {
    source: E,
    names: Vec<EntryName>,
    conflicts: ConflictSet,
}

/// State of one extraction call.
struct Run<'a, B: ArchiveBackend, S> {
    archive: &'a Path,
    label: String,
    dest: &'a DestDir,
    config: &'a ExtractionConfig,
    backend: &'a mut B,
    sink: &'a mut S,
    scan: Option<Scan<B::Source>>,
    report: ExtractionReport,
}

impl<B: ArchiveBackend, S: EventSink> Run<'_, B, S> {
    fn drive(mut self) -> Result<ExtractionReport> {
        let mut state = State::Init;
        loop {
            self.sink.record(&ExtractionEvent::PhaseEntered(state.phase()));
            let next = match state {
                State::Init => self.check_signature(),
                State::SignatureChecked { is_zip: false } => self.copy_raw(),
                State::SignatureChecked { is_zip: true } => self.scan_conflicts(),
                State::ConflictScanned if self.has_conflicts() => self.extract_safe(),
                State::ConflictScanned => self.attempt_primary(),
                State::PrimaryAttempted(Attempt::Extracted) | State::SafeExtracted => Ok(State::Done),
                State::PrimaryAttempted(Attempt::Abandoned) => self.extract_safe(),
                State::Done => {
                    self.sink.record(&ExtractionEvent::Finished {
                        strategy: self.report.strategy,
                        files: self.report.files_extracted,
                    });
                    return Ok(self.report);
                }
                State::Failed(err) => return Err(err),
            };
            state = next.unwrap_or_else(State::Failed);
        }
    }

    fn has_conflicts(&self) -> bool {
        self.scan.as_ref().is_some_and(|scan| !scan.conflicts.is_empty())
    }

    fn check_signature(&mut self) -> Result<State> {
        let is_zip = has_zip_signature(self.archive)?;
        Ok(State::SignatureChecked { is_zip })
    }

    fn copy_raw(&mut self) -> Result<State> {
        let file_name = self.archive.file_name().ok_or_else(|| {
            ExtractionError::InvalidArchive(format!("{} has no file name", self.archive.display()))
        })?;
        self.sink.record(&ExtractionEvent::SignatureMismatch {
            archive: self.archive.to_path_buf(),
        });

        let target = self.dest.join_path(Path::new(file_name));
        self.report.bytes_written = fs::copy(self.archive, &target)?;
        self.report.files_extracted = 1;
        self.report.strategy = Strategy::RawCopy;
        Ok(State::Done)
    }

    fn open_scan(&mut self) -> Result<Scan<B::Source>> {
        let mut source = self.backend.open_entries(self.archive)?;
        let names = source.list_entries()?;
        let conflicts = ConflictSet::detect(&names, self.config);
        Ok(Scan {
            source,
            names,
            conflicts,
        })
    }

    fn scan_conflicts(&mut self) -> Result<State> {
        match self.open_scan() {
            Ok(scan) => {
                if !scan.conflicts.is_empty() {
                    self.report.conflicts_found = scan.conflicts.len();
                    self.sink.record(&ExtractionEvent::ConflictsDetected {
                        count: scan.conflicts.len(),
                    });
                    let quarantine = scan.conflicts.quarantine_dir();
                    if quarantine != self.config.quarantine_dir {
                        self.report.add_warning(format!(
                            "archive already uses {:?}; quarantining into {quarantine:?}",
                            self.config.quarantine_dir
                        ));
                    }
                }
                self.scan = Some(scan);
            }
            Err(err) => {
                let reason = err.to_string();
                self.report
                    .add_warning(format!("cannot read name table: {reason}"));
                self.sink
                    .record(&ExtractionEvent::NameTableUnreadable { reason });
            }
        }
        Ok(State::ConflictScanned)
    }

    fn attempt_primary(&mut self) -> Result<State> {
        self.dest.clear()?;

        let status = match self
            .backend
            .extract_all(self.archive, self.dest.as_path(), &self.label)
        {
            Ok(status) => status,
            Err(err) => {
                let reason = err.to_string();
                self.report
                    .add_warning(format!("bulk extraction failed: {reason}"));
                self.sink.record(&ExtractionEvent::PrimaryFailed {
                    reason: reason.clone(),
                });
                self.report.primary_error = Some(reason);
                return Ok(State::PrimaryAttempted(Attempt::Abandoned));
            }
        };

        if let BulkStatus::Code(code) = status
            && !status.is_success()
        {
            return Err(ExtractionError::UnexpectedStatus { code });
        }
        if self.dest.is_empty()? {
            return Err(ExtractionError::EmptyExtraction {
                path: self.archive.to_path_buf(),
            });
        }

        if self.config.flatten_wrapper && flatten_wrapper(self.dest, &self.label)? {
            self.report.wrapper_flattened = true;
            self.sink.record(&ExtractionEvent::WrapperFlattened {
                label: self.label.clone(),
            });
        }

        self.report.strategy = Strategy::Primary;
        self.report.files_extracted = self.dest.count_files()?;
        Ok(State::PrimaryAttempted(Attempt::Extracted))
    }

    fn extract_safe(&mut self) -> Result<State> {
        self.dest.clear()?;

        let mut scan = match self.scan.take() {
            Some(scan) => scan,
            None => self.open_scan()?,
        };
        self.report.conflicts_found = scan.conflicts.len();

        extract_entries(
            &mut scan.source,
            &scan.names,
            &scan.conflicts,
            self.dest,
            self.config,
            &mut *self.sink,
            &mut self.report,
        )?;

        self.report.strategy = Strategy::Safe;
        self.report.files_extracted = self.dest.count_files()?;
        if self.report.files_extracted == 0 {
            return Err(ExtractionError::EmptyExtraction {
                path: self.archive.to_path_buf(),
            });
        }
        Ok(State::SafeExtracted)
    }
}
