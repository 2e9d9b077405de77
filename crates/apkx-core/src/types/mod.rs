//! Type-safe wrappers for archive extraction operations.
//!
//! Raw archive names stay raw ([`EntryName`]); anything that touches the
//! filesystem goes through a type that can only be produced by sanitization
//! ([`SafePath`]) or validation ([`DestDir`]).

pub mod dest_dir;
pub mod entry_name;
pub mod safe_path;

pub use dest_dir::DestDir;
pub use entry_name::EntryName;
pub use safe_path::SafePath;
