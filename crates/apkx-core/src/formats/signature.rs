//! Container signature detection.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::Result;

/// Local file header magic that starts every ZIP container (`PK\x03\x04`).
pub const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Returns whether the file starts with [`ZIP_MAGIC`].
///
/// Files shorter than four bytes never match.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn has_zip_signature(path: &Path) -> Result<bool> {
    let mut header = Vec::with_capacity(ZIP_MAGIC.len());
    File::open(path)?
        .take(ZIP_MAGIC.len() as u64)
        .read_to_end(&mut header)?;
    Ok(header == ZIP_MAGIC)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_zip_magic_matches() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "app.apk", b"PK\x03\x04rest-of-header");
        assert!(has_zip_signature(&path).unwrap());
    }

    #[test]
    fn test_other_bytes_do_not_match() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "classes.dex", b"dex\n035\0");
        assert!(!has_zip_signature(&path).unwrap());
    }

    #[test]
    fn test_end_of_directory_magic_is_not_enough() {
        // End-of-central-directory magic alone is not a local header.
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "empty.zip", b"PK\x05\x06");
        assert!(!has_zip_signature(&path).unwrap());
    }

    #[test]
    fn test_short_file_does_not_match() {
        let temp = TempDir::new().unwrap();
        assert!(!has_zip_signature(&write(&temp, "short", b"PK")).unwrap());
        assert!(!has_zip_signature(&write(&temp, "empty", b"")).unwrap());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let err = has_zip_signature(&temp.path().join("missing")).unwrap_err();
        assert!(matches!(err, crate::ExtractionError::Io(_)));
    }
}
