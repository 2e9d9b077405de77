//! Archive fingerprints.

use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;

use md5::Md5;
use sha1::Sha1;
use sha2::Digest;
use sha2::Sha256;

use crate::Result;

/// Read buffer size for hashing (64KB).
const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// Lowercase hex digests of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveDigests {
    /// MD5 digest.
    pub md5: String,
    /// SHA-1 digest.
    pub sha1: String,
    /// SHA-256 digest.
    pub sha256: String,
}

/// Computes MD5, SHA-1 and SHA-256 of the file in a single pass.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
///
/// # Examples
///
/// ```no_run
/// use apkx_core::hash_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let digests = hash_archive("app.apk")?;
/// println!("sha256 {}", digests.sha256);
/// # Ok(())
/// # }
/// ```
pub fn hash_archive<P: AsRef<Path>>(path: P) -> Result<ArchiveDigests> {
    let mut file = File::open(path.as_ref())?;
    let mut md5 = Md5::new();
    let mut sha1 = Sha1::new();
    let mut sha256 = Sha256::new();
    let mut buffer = vec![0u8; HASH_BUFFER_SIZE];

    loop {
        let read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        let chunk = &buffer[..read];
        md5.update(chunk);
        sha1.update(chunk);
        sha256.update(chunk);
    }

    Ok(ArchiveDigests {
        md5: hex::encode(md5.finalize()),
        sha1: hex::encode(sha1.finalize()),
        sha256: hex::encode(sha256.finalize()),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_known_digests() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("abc.bin");
        std::fs::write(&path, b"abc").unwrap();

        let digests = hash_archive(&path).unwrap();
        assert_eq!(digests.md5, "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(digests.sha1, "a9993e364706816aba3e25717850c26c9cd0d89d");
        assert_eq!(
            digests.sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_empty_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty");
        std::fs::write(&path, b"").unwrap();

        let digests = hash_archive(&path).unwrap();
        assert_eq!(digests.md5, "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(
            digests.sha256,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_spans_multiple_buffers() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("big");
        let data = vec![0x5Au8; HASH_BUFFER_SIZE * 2 + 17];
        std::fs::write(&path, &data).unwrap();

        let digests = hash_archive(&path).unwrap();
        assert_eq!(digests.sha256, hex::encode(Sha256::digest(&data)));
    }

    #[test]
    fn test_missing_file() {
        assert!(hash_archive("/nonexistent/app.apk").is_err());
    }
}
