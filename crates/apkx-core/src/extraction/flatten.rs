//! Wrapper directory flattening.
//!
//! Bulk extractors that write into `destination/<label>/` leave a single
//! wrapper directory named after the archive. Flattening moves its contents
//! up one level so both strategies produce the same layout.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use crate::Result;
use crate::types::DestDir;

/// Moves the contents of `destination/label` into `destination`.
///
/// Existing files at a target path are replaced, existing directories are
/// removed recursively. Returns `false` without touching anything when
/// `destination/label` is not a directory.
///
/// The wrapper is renamed to a free sibling first, so a child that shares the
/// wrapper's name can be moved up without deleting the wrapper itself.
///
/// # Errors
///
/// Returns an error if any rename or removal fails.
pub fn flatten_wrapper(dest: &DestDir, label: &str) -> Result<bool> {
    if label.is_empty() {
        return Ok(false);
    }
    let wrapper = dest.as_path().join(label);
    match fs::symlink_metadata(&wrapper) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Ok(false),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    }

    let staging = staging_path(dest.as_path(), &wrapper, label);
    fs::rename(&wrapper, &staging)?;

    for entry in fs::read_dir(&staging)? {
        let entry = entry?;
        let target = dest.as_path().join(entry.file_name());
        remove_existing(&target)?;
        fs::rename(entry.path(), &target)?;
    }

    fs::remove_dir_all(&staging)?;
    Ok(true)
}

/// Picks a sibling name that exists neither in the destination nor inside
/// the wrapper.
fn staging_path(root: &Path, wrapper: &Path, label: &str) -> PathBuf {
    let mut attempt = 0u32;
    loop {
        let mut name = OsString::from(format!(".{label}.flatten"));
        if attempt > 0 {
            name.push(format!(".{attempt}"));
        }
        let candidate = root.join(&name);
        if !exists(&candidate) && !exists(&wrapper.join(&name)) {
            return candidate;
        }
        attempt += 1;
    }
}

fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn remove_existing(path: &Path) -> io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
