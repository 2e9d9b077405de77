//! Raw archive entry names.

use std::fmt;

/// An entry name exactly as recorded in the archive's name table.
///
/// The name is not a filesystem path: it may be empty, end with `/`, contain
/// `.`/`..` segments or backslashes. It is never modified after reading; all
/// rewriting happens on copies produced by the remapper and sanitizer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryName(String);

impl EntryName {
    /// Wraps a raw name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the raw name.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the name ends with `/`.
    #[inline]
    #[must_use]
    pub fn is_dir_marker(&self) -> bool {
        self.0.ends_with('/')
    }

    /// Returns the name without its directory-marker suffix.
    #[inline]
    #[must_use]
    pub fn trimmed(&self) -> &str {
        self.0.strip_suffix('/').unwrap_or(&self.0)
    }

    /// Returns `true` if the entry should be materialized as a file.
    #[inline]
    #[must_use]
    pub fn is_file(&self) -> bool {
        !self.0.is_empty() && !self.is_dir_marker()
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for EntryName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for EntryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_marker() {
        let name = EntryName::from("res/");
        assert!(name.is_dir_marker());
        assert!(!name.is_file());
        assert_eq!(name.trimmed(), "res");
    }

    #[test]
    fn test_file_entry() {
        let name = EntryName::from("classes.dex");
        assert!(name.is_file());
        assert_eq!(name.trimmed(), "classes.dex");
        assert_eq!(name.to_string(), "classes.dex");
    }

    #[test]
    fn test_empty_name_is_not_a_file() {
        assert!(!EntryName::from("").is_file());
    }
}
