//! CLI argument parsing using clap.

use apkx_core::config::DEFAULT_PARENT_PLACEHOLDER;
use apkx_core::config::DEFAULT_QUARANTINE_DIR;
use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "apkx")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract an APK or ZIP archive for analysis
    Extract(ExtractArgs),
    /// Print MD5, SHA-1 and SHA-256 digests of a file
    Hash(HashArgs),
    /// Generate shell completion scripts
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Output directory, replaced on every run (default: ./<archive stem>)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Directory that receives files colliding with directory paths
    #[arg(long, value_name = "NAME", default_value = DEFAULT_QUARANTINE_DIR)]
    pub quarantine_dir: String,

    /// Segment written in place of `..` in entry names
    #[arg(long, value_name = "NAME", default_value = DEFAULT_PARENT_PLACEHOLDER)]
    pub parent_placeholder: String,

    /// Keep the wrapper directory named after the archive
    #[arg(long)]
    pub keep_wrapper: bool,

    /// Also print MD5, SHA-1 and SHA-256 of the archive
    #[arg(long)]
    pub hash: bool,
}

#[derive(clap::Args)]
pub struct HashArgs {
    /// File to hash
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_extract_defaults() {
        let cli = Cli::try_parse_from(["apkx", "extract", "app.apk"]).unwrap();
        let Commands::Extract(args) = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(args.quarantine_dir, "__conflicts__");
        assert_eq!(args.parent_placeholder, "__up__");
        assert!(args.output_dir.is_none());
        assert!(!args.keep_wrapper);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["apkx", "-q", "-v", "hash", "x"]).is_err());
    }
}
