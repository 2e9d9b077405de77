//! Subcommand implementations.

pub mod completion;
pub mod extract;
pub mod hash;
