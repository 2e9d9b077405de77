//! Relocation of conflicting entries into the quarantine subtree.

use std::borrow::Cow;

use super::ConflictSet;
use crate::types::EntryName;

/// Returns the name an entry should be extracted under.
///
/// A file that is also used as a directory by other entries is moved out of
/// the way, below `level` copies of the set's quarantine directory, keeping
/// its full relative name with redundant separators and `.` segments
/// removed. Every other entry, including the descendants that made the file
/// conflict, keeps its name. Both sides of each collision therefore land on
/// distinct, non-overlapping paths.
///
/// The result is still an archive name; it must go through the sanitizer
/// before touching the filesystem.
///
/// # Examples
///
/// ```
/// use apkx_core::ExtractionConfig;
/// use apkx_core::security::ConflictSet;
/// use apkx_core::security::remap_entry;
/// use apkx_core::types::EntryName;
///
/// let names: Vec<EntryName> = ["res/a.txt", "res/a.txt/b.txt"]
///     .into_iter()
///     .map(EntryName::from)
///     .collect();
/// let conflicts = ConflictSet::detect(&names, &ExtractionConfig::default());
///
/// assert_eq!(remap_entry(&names[0], &conflicts), "__conflicts__/res/a.txt");
/// assert_eq!(remap_entry(&names[1], &conflicts), "res/a.txt/b.txt");
/// ```
#[must_use]
pub fn remap_entry<'a>(name: &'a EntryName, conflicts: &ConflictSet) -> Cow<'a, str> {
    let level = if name.is_file() {
        conflicts.level(name.as_str())
    } else {
        None
    };
    let Some(level) = level else {
        return Cow::Borrowed(name.as_str());
    };

    let quarantine = conflicts.quarantine_dir();
    let mut remapped = String::with_capacity((quarantine.len() + 1) * level + name.as_str().len());
    for _ in 0..level {
        remapped.push_str(quarantine);
        remapped.push('/');
    }
    let segments = name
        .as_str()
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".");
    for (idx, segment) in segments.enumerate() {
        if idx > 0 {
            remapped.push('/');
        }
        remapped.push_str(segment);
    }
    Cow::Owned(remapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::ExtractionConfig;

    fn remap_all(raw: &[&str]) -> Vec<String> {
        let names: Vec<EntryName> = raw.iter().copied().map(EntryName::from).collect();
        let conflicts = ConflictSet::detect(&names, &ExtractionConfig::default());
        names
            .iter()
            .map(|name| remap_entry(name, &conflicts).into_owned())
            .collect()
    }

    #[test]
    fn test_no_conflicts_borrows() {
        let name = EntryName::from("classes.dex");
        let remapped = remap_entry(&name, &ConflictSet::default());
        assert!(matches!(remapped, Cow::Borrowed("classes.dex")));
    }

    #[test]
    fn test_conflicting_file_moves_descendant_stays() {
        assert_eq!(
            remap_all(&["res/a.txt", "res/a.txt/b.txt"]),
            vec!["__conflicts__/res/a.txt", "res/a.txt/b.txt"]
        );
    }

    #[test]
    fn test_nested_conflicts_do_not_collide_in_quarantine() {
        let remapped = remap_all(&["a", "a/b", "a/b/c"]);
        assert_eq!(
            remapped,
            vec!["__conflicts__/__conflicts__/a", "__conflicts__/a/b", "a/b/c"]
        );

        // No remapped path is an ancestor of another one.
        for x in &remapped {
            for y in &remapped {
                assert!(!y.starts_with(&format!("{x}/")), "{x} is an ancestor of {y}");
            }
        }
    }

    #[test]
    fn test_distinct_names_stay_distinct() {
        let raw = ["x", "x/y", "x/z", "x/y/w", "q", "q/r"];
        let remapped = remap_all(&raw);
        let unique: HashSet<_> = remapped.iter().collect();
        assert_eq!(unique.len(), raw.len());
    }

    #[test]
    fn test_directory_marker_is_not_relocated() {
        assert_eq!(remap_all(&["lib/", "lib/x.so"]), vec!["lib/", "lib/x.so"]);
    }

    #[test]
    fn test_quarantine_names_in_archive_are_not_shadowed() {
        let remapped = remap_all(&["a", "a/b", "__conflicts__/a"]);
        assert_eq!(remapped, vec!["__conflicts__-1/a", "a/b", "__conflicts__/a"]);
    }

    #[test]
    fn test_member_name_is_normalized() {
        assert_eq!(
            remap_all(&["./a", "a\\b"]),
            vec!["__conflicts__/a", "a\\b"]
        );
    }

    #[test]
    fn test_member_keeps_traversal_for_sanitizer() {
        let remapped = remap_all(&["../x", "../x/y"]);
        assert_eq!(remapped[0], "__conflicts__/../x");
    }
}
