//! Entry-by-entry extraction with conflict remapping and sanitization.

use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;

use crate::ExtractionConfig;
use crate::Result;
use crate::events::EventSink;
use crate::events::ExtractionEvent;
use crate::formats::EntrySource;
use crate::report::ExtractionReport;
use crate::security::ConflictSet;
use crate::security::remap_entry;
use crate::security::sanitize_entry_name;
use crate::types::DestDir;
use crate::types::EntryName;

/// Writes every file entry of `names` below `dest`.
///
/// Each name is remapped, then sanitized. Names that reduce to nothing are
/// skipped; directory markers are ignored since parents are created on
/// demand. Counters are accumulated into `report`.
///
/// Any read or write failure is returned immediately.
pub(crate) fn extract_entries<E, S>(
    source: &mut E,
    names: &[EntryName],
    conflicts: &ConflictSet,
    dest: &DestDir,
    config: &ExtractionConfig,
    sink: &mut S,
    report: &mut ExtractionReport,
) -> Result<()>
where
    E: EntrySource + ?Sized,
    S: EventSink + ?Sized,
{
    for name in names.iter().filter(|name| name.is_file()) {
        let remapped = remap_entry(name, conflicts);
        if remapped != name.as_str() {
            report.entries_remapped += 1;
            sink.record(&ExtractionEvent::EntryRemapped {
                name: name.to_string(),
                remapped: remapped.to_string(),
            });
        }

        let Some(safe) = sanitize_entry_name(&remapped, config) else {
            report.entries_skipped += 1;
            sink.record(&ExtractionEvent::EntrySkipped {
                name: name.to_string(),
            });
            continue;
        };
        if safe.traversal_segments() > 0 {
            report.entries_sanitized += 1;
            sink.record(&ExtractionEvent::EntrySanitized {
                name: name.to_string(),
                path: safe.as_path().to_path_buf(),
            });
        }

        let output = dest.join(&safe);
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(&output)?);
        let bytes = source.copy_entry(name, &mut writer)?;
        writer.flush()?;

        report.bytes_written += bytes;
        sink.record(&ExtractionEvent::EntryWritten {
            path: safe.into_path_buf(),
            bytes,
        });
    }
    Ok(())
}
