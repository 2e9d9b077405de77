//! Extraction strategies and the executor that chooses between them.

pub mod executor;
pub mod flatten;
mod safe;

pub use executor::Extractor;
pub use flatten::flatten_wrapper;
