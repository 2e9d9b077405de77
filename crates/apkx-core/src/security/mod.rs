//! Security primitives for untrusted archive name tables.
//!
//! - [`ConflictSet`]: files that other entries use as a directory
//! - [`remap_entry`]: moves those files into the quarantine subtree
//! - [`sanitize_entry_name`]: neutralizes traversal in every name

pub mod conflict;
pub mod remap;
pub mod sanitize;

pub use conflict::ConflictSet;
pub use remap::remap_entry;
pub use sanitize::sanitize_entry_name;
