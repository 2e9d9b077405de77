//! Safe extraction of APK and other ZIP containers.
//!
//! `apkx-core` unpacks untrusted archives into a destination directory for
//! downstream analysis. A bulk extractor is tried first; archives whose
//! names collide (a file also used as a directory) or that the bulk
//! extractor rejects are extracted entry by entry instead, with colliding
//! files moved into a quarantine subtree and traversal segments
//! neutralized. Inputs that are not ZIP containers are copied verbatim.
//!
//! # Examples
//!
//! ```no_run
//! use apkx_core::ExtractionConfig;
//! use apkx_core::extract_apk;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExtractionConfig::default();
//! let report = extract_apk("app.apk", "/output/dir", &config)?;
//! println!("Extracted {} files", report.files_extracted);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod digest;
pub mod error;
pub mod events;
pub mod extraction;
pub mod formats;
pub mod report;
pub mod security;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
#[doc(hidden)]
pub mod test_utils;

// Re-export main API types
pub use api::extract_apk;
pub use config::ExtractionConfig;
pub use digest::ArchiveDigests;
pub use digest::hash_archive;
pub use error::ExtractionError;
pub use error::Result;
pub use events::EventSink;
pub use events::ExtractionEvent;
pub use events::NoopSink;
pub use events::TracingSink;
pub use extraction::Extractor;
pub use report::ExtractionOutcome;
pub use report::ExtractionReport;
pub use report::Strategy;

// Re-export types module for easier access
pub use types::DestDir;
pub use types::EntryName;
pub use types::SafePath;
