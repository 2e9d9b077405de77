//! Archive backends.

pub mod signature;
pub mod traits;
pub mod zip;

pub use signature::ZIP_MAGIC;
pub use signature::has_zip_signature;
pub use traits::ArchiveBackend;
pub use traits::BulkStatus;
pub use traits::EntrySource;
pub use zip::ZipBackend;
pub use zip::ZipEntrySource;
