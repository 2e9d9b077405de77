//! Validated destination directory type.

use crate::ExtractionError;
use crate::Result;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

use super::SafePath;

/// A validated destination directory for archive extraction.
///
/// This type represents a directory that has been validated to:
/// - Exist on the filesystem
/// - Be a directory (not a file)
/// - Be writable by the current process
/// - Be represented as an absolute canonical path
///
/// The directory is owned by the caller. The executor only clears and fills
/// its contents; it never removes the directory itself.
///
/// # Examples
///
/// ```no_run
/// use apkx_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::create("/tmp/sample.apk_tmp")?;
/// println!("Extracting to: {}", dest.as_path().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestDir(PathBuf);

impl DestDir {
    /// Creates a new `DestDir` after validating an existing directory.
    ///
    /// # Validation
    ///
    /// 1. Verifies the path exists
    /// 2. Verifies the path is a directory
    /// 3. Canonicalizes the path to an absolute path
    /// 4. Checks write permissions (Unix)
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::Io` if any check fails.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(ExtractionError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("destination directory does not exist: {}", path.display()),
            )));
        }

        if !path.is_dir() {
            return Err(ExtractionError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("path is not a directory: {}", path.display()),
            )));
        }

        let canonical = path.canonicalize().map_err(|e| {
            ExtractionError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to canonicalize path {}: {}", path.display(), e),
            ))
        })?;

        #[cfg(unix)]
        {
            use std::ffi::CString;
            use std::os::unix::ffi::OsStrExt;

            let path_cstring = CString::new(canonical.as_os_str().as_bytes()).map_err(|_| {
                ExtractionError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "path contains null byte",
                ))
            })?;

            // SAFETY: access() only reads the NUL-terminated string, which
            // outlives the call.
            #[allow(unsafe_code)]
            let result = unsafe { libc::access(path_cstring.as_ptr(), libc::W_OK) };

            if result != 0 {
                return Err(ExtractionError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    format!("directory is not writable: {}", canonical.display()),
                )));
            }
        }

        Ok(Self(canonical))
    }

    /// Creates the directory (and missing parents) if needed, then validates
    /// it like [`DestDir::new`].
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        fs::create_dir_all(&path)?;
        Self::new(path)
    }

    /// Returns the path as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Joins a `SafePath` to this destination directory.
    #[inline]
    #[must_use]
    pub fn join(&self, safe_path: &SafePath) -> PathBuf {
        self.0.join(safe_path.as_path())
    }

    /// Joins a path that is already known to stay inside the destination.
    #[inline]
    #[must_use]
    pub fn join_path(&self, path: &Path) -> PathBuf {
        self.0.join(path)
    }

    /// Removes everything inside the directory, keeping the directory.
    ///
    /// Symlinks are removed, never followed.
    pub fn clear(&self) -> Result<()> {
        for entry in fs::read_dir(&self.0)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                fs::remove_dir_all(&path)?;
            } else {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    /// Returns `true` if the directory has no entries.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(fs::read_dir(&self.0)?.next().is_none())
    }

    /// Counts regular files anywhere below the directory.
    pub fn count_files(&self) -> Result<usize> {
        let mut count = 0;
        for entry in WalkDir::new(&self.0).follow_links(false) {
            let entry = entry.map_err(|e| {
                ExtractionError::Io(
                    e.into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("filesystem loop detected")),
                )
            })?;
            if entry.file_type().is_file() {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Converts into the inner `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dest_dir_valid() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = DestDir::new(temp.path().to_path_buf()).expect("dest should be valid");
        assert!(dest.as_path().is_absolute());
    }

    #[test]
    fn test_dest_dir_nonexistent() {
        let result = DestDir::new("/nonexistent/directory/that/does/not/exist");
        assert!(matches!(result, Err(ExtractionError::Io(_))));
    }

    #[test]
    fn test_dest_dir_not_a_directory() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let file_path = temp.path().join("file.txt");
        fs::write(&file_path, "test").expect("failed to write file");

        assert!(matches!(DestDir::new(file_path), Err(ExtractionError::Io(_))));
    }

    #[test]
    fn test_create_missing_directory() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let nested = temp.path().join("a").join("b");
        let dest = DestDir::create(&nested).expect("should create");
        assert!(nested.is_dir());
        assert_eq!(dest.as_path(), nested.canonicalize().unwrap());
    }

    #[test]
    fn test_clear_keeps_directory() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = DestDir::new(temp.path()).unwrap();
        fs::create_dir_all(temp.path().join("x/y")).unwrap();
        fs::write(temp.path().join("x/y/z.txt"), "z").unwrap();
        fs::write(temp.path().join("top.txt"), "t").unwrap();

        assert!(!dest.is_empty().unwrap());
        assert_eq!(dest.count_files().unwrap(), 2);

        dest.clear().unwrap();
        assert!(temp.path().is_dir());
        assert!(dest.is_empty().unwrap());
        assert_eq!(dest.count_files().unwrap(), 0);
    }

    #[test]
    #[cfg(unix)]
    fn test_clear_does_not_follow_symlinks() {
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("keep.txt"), "keep").unwrap();

        let temp = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path(), temp.path().join("link")).unwrap();
        let dest = DestDir::new(temp.path()).unwrap();

        dest.clear().unwrap();
        assert!(dest.is_empty().unwrap());
        assert!(outside.path().join("keep.txt").exists());
    }

    #[test]
    fn test_join_safe_path() {
        let temp = TempDir::new().unwrap();
        let dest = DestDir::new(temp.path()).unwrap();
        let safe = SafePath::sanitize("../x/y.txt", "__up__").unwrap();
        let joined = dest.join(&safe);
        assert!(joined.starts_with(dest.as_path()));
        assert!(joined.ends_with("__up__/x/y.txt"));
    }

    #[test]
    #[cfg(unix)]
    fn test_dest_dir_permissions_check() {
        use std::os::unix::fs::PermissionsExt;

        // root bypasses mode bits, nothing to assert there
        #[allow(unsafe_code)]
        if unsafe { libc::geteuid() } == 0 {
            return;
        }

        let temp = TempDir::new().expect("failed to create temp dir");
        let readonly_dir = temp.path().join("readonly");
        fs::create_dir(&readonly_dir).expect("failed to create dir");

        let mut perms = fs::metadata(&readonly_dir).unwrap().permissions();
        perms.set_mode(0o555);
        fs::set_permissions(&readonly_dir, perms).unwrap();

        let result = DestDir::new(readonly_dir.clone());

        let mut perms = fs::metadata(&readonly_dir).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&readonly_dir, perms).unwrap();

        assert!(result.is_err());
    }
}
