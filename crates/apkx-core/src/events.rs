//! Extraction telemetry.
//!
//! The executor never logs directly. It reports [`ExtractionEvent`]s to an
//! injected [`EventSink`]; the default [`TracingSink`] forwards them to
//! `tracing`, leaving subscriber setup to the host process.

use std::path::PathBuf;

use crate::report::Strategy;

/// Executor state, as reported on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Inputs received, nothing read yet.
    Init,
    /// Archive signature has been read.
    SignatureChecked,
    /// Name table scanned for path conflicts.
    ConflictScanned,
    /// Bulk extraction has been attempted.
    PrimaryAttempted,
    /// Entry-by-entry safe extraction has completed.
    SafeExtracted,
    /// Terminal success.
    Done,
    /// Terminal failure.
    Failed,
}

/// Something worth recording during one extraction call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionEvent {
    /// The executor moved to a new state.
    PhaseEntered(Phase),
    /// Input does not start with the ZIP magic; it is copied verbatim.
    SignatureMismatch {
        /// The input file.
        archive: PathBuf,
    },
    /// The name table could not be read during the conflict scan.
    NameTableUnreadable {
        /// Parser message.
        reason: String,
    },
    /// Files used as directories were found; the bulk extractor is skipped.
    ConflictsDetected {
        /// Number of conflicting files.
        count: usize,
    },
    /// The bulk extractor failed and the safe strategy takes over.
    PrimaryFailed {
        /// Error reported by the bulk extractor.
        reason: String,
    },
    /// A wrapper directory named after the archive was merged into the
    /// destination.
    WrapperFlattened {
        /// Wrapper directory name.
        label: String,
    },
    /// A conflicting entry was relocated into the quarantine subtree.
    EntryRemapped {
        /// Raw entry name.
        name: String,
        /// Name after remapping.
        remapped: String,
    },
    /// Traversal segments in an entry name were neutralized.
    EntrySanitized {
        /// Raw entry name.
        name: String,
        /// Relative path actually written.
        path: PathBuf,
    },
    /// An entry reduced to nothing and was not written.
    EntrySkipped {
        /// Raw entry name.
        name: String,
    },
    /// A file was written by the safe strategy.
    EntryWritten {
        /// Relative path written.
        path: PathBuf,
        /// Bytes written.
        bytes: u64,
    },
    /// The call finished successfully.
    Finished {
        /// Strategy that produced the destination contents.
        strategy: Strategy,
        /// Regular files in the destination.
        files: usize,
    },
}

/// Receives extraction events.
///
/// # Examples
///
/// ```
/// use apkx_core::events::EventSink;
/// use apkx_core::events::ExtractionEvent;
///
/// #[derive(Default)]
/// struct CountingSink(usize);
///
/// impl EventSink for CountingSink {
///     fn record(&mut self, _event: &ExtractionEvent) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait EventSink {
    /// Records one event.
    fn record(&mut self, event: &ExtractionEvent);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn record(&mut self, event: &ExtractionEvent) {
        (**self).record(event);
    }
}

/// Forwards events to `tracing`.
///
/// Routing decisions are `info`, recovered failures are `warn`, per-entry
/// events are `debug`/`trace`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&mut self, event: &ExtractionEvent) {
        use tracing::{debug, info, trace, warn};

        match event {
            ExtractionEvent::PhaseEntered(phase) => trace!(?phase, "extraction state"),
            ExtractionEvent::SignatureMismatch { archive } => info!(
                archive = %archive.display(),
                "not a ZIP container, copying raw file"
            ),
            ExtractionEvent::NameTableUnreadable { reason } => {
                warn!(%reason, "cannot read archive name table, trying bulk extraction");
            }
            ExtractionEvent::ConflictsDetected { count } => {
                info!(count, "path conflicts detected, using safe extraction");
            }
            ExtractionEvent::PrimaryFailed { reason } => {
                warn!(%reason, "bulk extraction failed, falling back to safe extraction");
            }
            ExtractionEvent::WrapperFlattened { label } => debug!(%label, "flattened wrapper directory"),
            ExtractionEvent::EntryRemapped { name, remapped } => {
                debug!(%name, %remapped, "relocated conflicting entry");
            }
            ExtractionEvent::EntrySanitized { name, path } => {
                warn!(%name, path = %path.display(), "neutralized traversal in entry name");
            }
            ExtractionEvent::EntrySkipped { name } => debug!(%name, "skipped empty entry name"),
            ExtractionEvent::EntryWritten { path, bytes } => {
                trace!(path = %path.display(), bytes, "wrote entry");
            }
            ExtractionEvent::Finished { strategy, files } => {
                info!(?strategy, files, "extraction complete");
            }
        }
    }
}

/// Discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn record(&mut self, _event: &ExtractionEvent) {}
}
