//! File/directory path conflict detection.
//!
//! An archive can record `res/a.txt` as a file and also contain
//! `res/a.txt/b.txt`, which needs `res/a.txt` to be a directory. Whichever
//! entry is written second either fails or clobbers the first one. The
//! detector finds every such file up front so the executor can route the
//! archive to the safe strategy.
//!
//! Names are compared in their on-disk form, after separators, empty and
//! `.` segments and traversal are normalized the way the sanitizer writes
//! them. `a` and `./a//b` therefore conflict just like `a` and `a/b`.

use std::collections::BTreeMap;
use std::collections::HashSet;

use crate::ExtractionConfig;
use crate::types::EntryName;
use crate::types::SafePath;

/// Files that are also used as an ancestor directory of another file.
///
/// Every member is a file entry of the archive, keyed by its normalized
/// name. Each member carries a nesting level used by the remapper: 1 for a
/// member with no conflicting descendants, otherwise one more than the
/// deepest-nested conflicting descendant. Level `n` means the file is
/// relocated under `n` quarantine directories, so conflicting files that are
/// themselves nested never collide inside the quarantine subtree.
///
/// The quarantine directory is the configured name unless an entry of the
/// archive already lives under it; then the first free `<name>-N` is used,
/// so relocated files never share a path with an archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictSet {
    levels: BTreeMap<String, usize>,
    quarantine: String,
    placeholder: String,
}

impl ConflictSet {
    /// Scans a name table and returns the conflicting file names.
    ///
    /// Directory markers (names ending in `/`) and names that normalize to
    /// nothing never become members; they can be the prefix of another
    /// entry without conflict.
    ///
    /// # Examples
    ///
    /// ```
    /// use apkx_core::ExtractionConfig;
    /// use apkx_core::security::ConflictSet;
    /// use apkx_core::types::EntryName;
    ///
    /// let names: Vec<EntryName> = ["res/a.txt", "res/a.txt/b.txt", "res/", "lib", "./lib//x.so"]
    ///     .into_iter()
    ///     .map(EntryName::from)
    ///     .collect();
    ///
    /// let conflicts = ConflictSet::detect(&names, &ExtractionConfig::default());
    /// assert!(conflicts.contains("res/a.txt"));
    /// assert!(conflicts.contains("lib"));
    /// assert!(!conflicts.contains("res"));
    /// assert_eq!(conflicts.len(), 2);
    /// assert_eq!(conflicts.quarantine_dir(), "__conflicts__");
    /// ```
    #[must_use]
    pub fn detect(names: &[EntryName], config: &ExtractionConfig) -> Self {
        let keys: Vec<String> = names
            .iter()
            .filter(|name| name.is_file())
            .filter_map(|name| layout_key(name.as_str(), &config.parent_placeholder))
            .collect();
        let files: HashSet<&str> = keys.iter().map(String::as_str).collect();

        let mut levels: BTreeMap<String, usize> = BTreeMap::new();
        for file in &files {
            for ancestor in ancestors(file) {
                if files.contains(ancestor) && !levels.contains_key(ancestor) {
                    levels.insert(ancestor.to_string(), 1);
                }
            }
        }
        assign_levels(&mut levels);

        Self {
            levels,
            quarantine: unused_root(&config.quarantine_dir, &files),
            placeholder: config.parent_placeholder.clone(),
        }
    }

    /// Returns `true` if no conflicts were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of conflicting files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Returns `true` if `name`, once normalized, is a member.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.level(name).is_some()
    }

    /// Quarantine nesting level of a member.
    #[must_use]
    pub fn level(&self, name: &str) -> Option<usize> {
        let key = layout_key(name, &self.placeholder)?;
        self.levels.get(&key).copied()
    }

    /// Directory that relocated members are placed under.
    #[must_use]
    pub fn quarantine_dir(&self) -> &str {
        &self.quarantine
    }

    /// Iterates normalized member names in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.levels.keys().map(String::as_str)
    }
}

impl Default for ConflictSet {
    fn default() -> Self {
        Self::detect(&[], &ExtractionConfig::default())
    }
}

/// Normalized on-disk form of an entry name, `None` if it reduces to
/// nothing.
fn layout_key(name: &str, placeholder: &str) -> Option<String> {
    SafePath::sanitize(name, placeholder).map(|safe| safe.to_slash_string())
}

/// First of `preferred`, `preferred-1`, `preferred-2`, ... that is not the
/// top-level segment of any file.
fn unused_root(preferred: &str, files: &HashSet<&str>) -> String {
    let roots: HashSet<&str> = files
        .iter()
        .map(|key| key.split_once('/').map_or(*key, |(root, _)| root))
        .collect();

    let mut candidate = preferred.to_string();
    let mut suffix = 0;
    while roots.contains(candidate.as_str()) {
        suffix += 1;
        candidate = format!("{preferred}-{suffix}");
    }
    candidate
}

/// Strict ancestor prefixes of a slash-separated path, shortest first.
///
/// `a/b/c` yields `a` then `a/b`. A leading `/` does not yield an empty
/// prefix.
fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices('/')
        .map(move |(idx, _)| &path[..idx])
        .filter(|prefix| !prefix.is_empty())
}

/// Propagates levels from deeper members to their member ancestors.
///
/// A descendant always has more `/` separators than its ancestor, so walking
/// members from the most separators down finalizes each level before it is
/// propagated.
fn assign_levels(levels: &mut BTreeMap<String, usize>) {
    let mut by_depth: Vec<(usize, String)> = levels
        .keys()
        .map(|name| (name.matches('/').count(), name.clone()))
        .collect();
    by_depth.sort_unstable_by(|a, b| b.0.cmp(&a.0));

    for (_, member) in by_depth {
        let Some(&level) = levels.get(&member) else {
            continue;
        };
        for ancestor in ancestors(&member) {
            if let Some(ancestor_level) = levels.get_mut(ancestor) {
                *ancestor_level = (*ancestor_level).max(level + 1);
            }
        }
    }
}
