//! Extraction configuration.

use std::path::Component;
use std::path::Path;

use crate::ExtractionError;
use crate::Result;

/// Default name of the quarantine subtree for conflicting entries.
pub const DEFAULT_QUARANTINE_DIR: &str = "__conflicts__";

/// Default literal that replaces `..` segments.
pub const DEFAULT_PARENT_PLACEHOLDER: &str = "__up__";

/// Configuration for one extraction call.
///
/// The defaults match the layout downstream scanners expect, so most callers
/// use `ExtractionConfig::default()` unchanged.
///
/// # Examples
///
/// ```
/// use apkx_core::ExtractionConfig;
///
/// let config = ExtractionConfig::default()
///     .with_quarantine_dir("__collisions__")
///     .with_flatten_wrapper(false);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionConfig {
    /// Reserved top-level directory that receives relocated conflicting
    /// files.
    pub quarantine_dir: String,

    /// Inert segment written in place of every `..` segment.
    pub parent_placeholder: String,

    /// Flatten a single top-level wrapper directory named after the archive
    /// after a successful bulk extraction.
    pub flatten_wrapper: bool,
}

impl Default for ExtractionConfig {
    /// Default values:
    /// - `quarantine_dir`: `__conflicts__`
    /// - `parent_placeholder`: `__up__`
    /// - `flatten_wrapper`: true
    fn default() -> Self {
        Self {
            quarantine_dir: DEFAULT_QUARANTINE_DIR.to_string(),
            parent_placeholder: DEFAULT_PARENT_PLACEHOLDER.to_string(),
            flatten_wrapper: true,
        }
    }
}

impl ExtractionConfig {
    /// Sets the quarantine directory name.
    #[must_use]
    pub fn with_quarantine_dir(mut self, name: impl Into<String>) -> Self {
        self.quarantine_dir = name.into();
        self
    }

    /// Sets the traversal placeholder segment.
    #[must_use]
    pub fn with_parent_placeholder(mut self, segment: impl Into<String>) -> Self {
        self.parent_placeholder = segment.into();
        self
    }

    /// Enables or disables wrapper flattening.
    #[must_use]
    pub fn with_flatten_wrapper(mut self, flatten: bool) -> Self {
        self.flatten_wrapper = flatten;
        self
    }

    /// Checks that both reserved names are single, inert path segments.
    ///
    /// A quarantine name such as `../x` or a placeholder of `..` would
    /// reintroduce exactly the escapes the sanitizer removes.
    pub fn validate(&self) -> Result<()> {
        check_segment("quarantine_dir", &self.quarantine_dir)?;
        check_segment("parent_placeholder", &self.parent_placeholder)?;
        Ok(())
    }
}

fn check_segment(field: &str, value: &str) -> Result<()> {
    let invalid = |why: &str| ExtractionError::InvalidConfig {
        reason: format!("{field} {why}: {value:?}"),
    };

    if value.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if value.contains(['/', '\\', '\0']) {
        return Err(invalid("must be a single path segment"));
    }
    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(invalid("must be a plain file name")),
    }
}
