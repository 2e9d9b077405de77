//! Path traversal neutralization.

use crate::ExtractionConfig;
use crate::types::SafePath;

/// Sanitizes an (already remapped) entry name for extraction.
///
/// Delegates to [`SafePath::sanitize`] with the configured placeholder.
/// Applied to every entry, conflicting or not: traversal attempts are
/// independent of file/directory collisions.
///
/// Returns `None` when the name reduces to nothing; the caller skips the
/// entry.
///
/// # Examples
///
/// ```
/// use apkx_core::ExtractionConfig;
/// use apkx_core::security::sanitize_entry_name;
/// use std::path::Path;
///
/// let config = ExtractionConfig::default();
/// let safe = sanitize_entry_name("..\\..\\etc/passwd", &config).unwrap();
/// assert_eq!(safe.as_path(), Path::new("__up__/__up__/etc/passwd"));
/// ```
#[must_use]
pub fn sanitize_entry_name(name: &str, config: &ExtractionConfig) -> Option<SafePath> {
    SafePath::sanitize(name, &config.parent_placeholder)
}
