//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use anyhow::anyhow;
use apkx_core::ExtractionConfig;
use apkx_core::extract_apk;
use apkx_core::hash_archive;
use std::path::Path;
use std::path::PathBuf;

pub fn execute(args: &ExtractArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => default_output_dir(&args.archive)?,
    };

    let config = ExtractionConfig::default()
        .with_quarantine_dir(args.quarantine_dir.as_str())
        .with_parent_placeholder(args.parent_placeholder.as_str())
        .with_flatten_wrapper(!args.keep_wrapper);

    let digests = if args.hash {
        Some(add_archive_context(hash_archive(&args.archive), &args.archive)?)
    } else {
        None
    };

    let report = add_archive_context(extract_apk(&args.archive, &output_dir, &config), &args.archive)?;

    formatter.format_extraction_result(&output_dir, &report, digests.as_ref())
}

/// `./<archive stem>`, so the default never clears the working directory.
fn default_output_dir(archive: &Path) -> Result<PathBuf> {
    archive
        .file_stem()
        .filter(|stem| !stem.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| {
            anyhow!(
                "Cannot derive an output directory from '{}'\n\
                 HINT: Pass OUTPUT_DIR explicitly.",
                archive.display()
            )
        })
}
