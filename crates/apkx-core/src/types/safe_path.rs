//! Sanitized relative path type for archive extraction.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// A relative path that is safe to join under a destination directory.
///
/// `SafePath` is a non-empty sequence of non-empty segments, none of which is
/// `.` or `..`. Traversal segments are not dropped: each one is rewritten to
/// an inert placeholder segment so that no information about the original
/// name is lost.
///
/// # Security Properties
///
/// - Can ONLY be constructed through [`SafePath::sanitize`]
/// - NO `From<PathBuf>` implementation
/// - Joining to a destination always yields a strict descendant of it
///
/// # Examples
///
/// ```
/// use apkx_core::types::SafePath;
/// use std::path::Path;
///
/// let safe = SafePath::sanitize("../../etc/passwd", "__up__").unwrap();
/// assert_eq!(safe.as_path(), Path::new("__up__/__up__/etc/passwd"));
/// assert_eq!(safe.traversal_segments(), 2);
///
/// assert!(SafePath::sanitize("./", "__up__").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SafePath {
    path: PathBuf,
    traversal_segments: usize,
}

impl SafePath {
    /// Normalizes an archive-internal name into a safe relative path.
    ///
    /// # Steps
    ///
    /// 1. Reject names containing NUL bytes
    /// 2. Treat `\` as a separator
    /// 3. Drop empty and `.` segments (this also strips leading `/`)
    /// 4. Replace `..` with `placeholder`
    /// 5. Replace any segment the platform would not parse as one plain
    ///    component (e.g. `C:` on Windows) with `placeholder`
    ///
    /// Returns `None` when nothing remains; callers skip such entries.
    #[must_use]
    pub fn sanitize(name: &str, placeholder: &str) -> Option<Self> {
        if name.contains('\0') {
            return None;
        }

        let normalized = name.replace('\\', "/");
        let mut path = PathBuf::new();
        let mut traversal_segments = 0;

        for segment in normalized.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    traversal_segments += 1;
                    path.push(placeholder);
                }
                _ if is_plain_component(segment) => path.push(segment),
                _ => {
                    traversal_segments += 1;
                    path.push(placeholder);
                }
            }
        }

        if path.as_os_str().is_empty() {
            return None;
        }

        Some(Self {
            path,
            traversal_segments,
        })
    }

    /// Returns the path as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// Number of segments that were rewritten to the placeholder.
    #[inline]
    #[must_use]
    pub fn traversal_segments(&self) -> usize {
        self.traversal_segments
    }

    /// Number of segments in the path.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.path.components().count()
    }

    /// Iterates the path segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.components().filter_map(|component| match component {
            Component::Normal(segment) => segment.to_str(),
            _ => None,
        })
    }

    /// Segments joined with `/`, independent of the platform separator.
    #[must_use]
    pub fn to_slash_string(&self) -> String {
        self.segments().collect::<Vec<_>>().join("/")
    }

    /// Converts into the inner `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.path
    }
}

fn is_plain_component(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
