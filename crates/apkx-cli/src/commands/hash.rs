//! Hash command implementation.

use crate::cli::HashArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use apkx_core::hash_archive;

pub fn execute(args: &HashArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let digests = add_archive_context(hash_archive(&args.file), &args.file)?;
    formatter.format_digests(&args.file, &digests)
}
