//! Command-line interface definitions.
//!
//! All CLI arguments and options use the clap derive API, with global
//! options (verbosity, quiet, JSON errors) and a `scan` subcommand.
//!
//! # Example
//!
//! ```bash
//! # Find byte-identical duplicates under two roots
//! dupesweep scan ~/Downloads ~/Music
//!
//! # Name-based detection with JSON output
//! dupesweep scan ~/Documents --strategy name-different-size --output json
//!
//! # Size filters and deletion with pacing
//! dupesweep scan ~/Downloads --min-size 1MiB --delete --delay-ms 200
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::duplicates::Strategy;
use crate::scanner::Category;

/// Duplicate file finder with safe, resumable deletion.
///
/// dupesweep finds duplicate files by content hash (BLAKE3) or by name
/// heuristics, and deletes them via the system trash with a permanent
/// fallback.
#[derive(Debug, Parser)]
#[command(name = "dupesweep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Emit errors as structured JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan one or more directories for duplicate files
    Scan(ScanArgs),
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directories to scan (duplicates are detected across all of them)
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Detection strategy
    #[arg(short, long, value_enum, default_value = "content-hash")]
    pub strategy: StrategyArg,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Minimum file size to consider (e.g., 1KB, 1MiB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Maximum file size to consider (e.g., 100MB, 1GiB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub max_size: Option<u64>,

    /// Maximum directory depth below each root
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Directory name tokens to skip (can be given multiple times)
    ///
    /// Matched case-insensitively as a substring; a matching directory is
    /// pruned along with its entire subtree.
    #[arg(long = "exclude-dir", value_name = "NAME")]
    pub exclude_dirs: Vec<String>,

    /// Restrict the scan to these file categories (can be given multiple times)
    #[arg(long = "category", value_enum, value_name = "CATEGORY")]
    pub categories: Vec<CategoryArg>,

    /// Path to a JSON configuration file; CLI flags override its values
    #[arg(short, long, value_name = "PATH", env = "DUPESWEEP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Delete all duplicates, keeping the best copy of each group
    #[arg(long)]
    pub delete: bool,

    /// Delay between deletions in milliseconds
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Number of I/O threads for hashing (default: 4)
    ///
    /// Lower values reduce disk thrashing on HDDs.
    #[arg(long, value_name = "N")]
    pub io_threads: Option<usize>,

    /// Write deletion history as CSV to this file
    #[arg(long, value_name = "PATH")]
    pub history: Option<PathBuf>,
}

/// Detection strategy as exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Same name and size, confirmed byte-identical
    ContentHash,
    /// Same name and exact size, no content read
    NameAndSize,
    /// Same name with differing sizes (likely versions)
    NameDifferentSize,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::ContentHash => Strategy::ContentHash,
            StrategyArg::NameAndSize => Strategy::NameAndSize,
            StrategyArg::NameDifferentSize => Strategy::NameDifferentSize,
        }
    }
}

/// File category as exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    /// Audio files
    Audio,
    /// Video files
    Video,
    /// Image files
    Image,
    /// Document files
    Document,
    /// Archive files
    Archive,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Audio => Category::Audio,
            CategoryArg::Video => Category::Video,
            CategoryArg::Image => Category::Image,
            CategoryArg::Document => Category::Document,
            CategoryArg::Archive => Category::Archive,
        }
    }
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table on stdout
    Table,
    /// JSON output for scripting
    Json,
    /// CSV output for spreadsheets
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports decimal (KB, MB, GB) and binary (KiB, MiB, GiB) suffixes;
/// bare numbers are bytes.
///
/// # Errors
///
/// Returns an error message for empty strings or unknown suffixes.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("size cannot be empty".to_string());
    }
    s.parse::<bytesize::ByteSize>()
        .map(|b| b.as_u64())
        .map_err(|e| format!("invalid size '{s}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_size_plain_bytes() {
        assert_eq!(parse_size("1024").unwrap(), 1024);
        assert_eq!(parse_size("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_size_suffixes() {
        assert_eq!(parse_size("1KB").unwrap(), 1_000);
        assert_eq!(parse_size("1KiB").unwrap(), 1_024);
        assert_eq!(parse_size("1MB").unwrap(), 1_000_000);
        assert_eq!(parse_size("1MiB").unwrap(), 1_048_576);
    }

    #[test]
    fn test_parse_size_rejects_garbage() {
        assert!(parse_size("").is_err());
        assert!(parse_size("lots").is_err());
    }

    #[test]
    fn test_scan_args_parsing() {
        let cli = Cli::try_parse_from([
            "dupesweep",
            "scan",
            "/data",
            "/backup",
            "--strategy",
            "name-and-size",
            "--exclude-dir",
            "node_modules",
            "--min-size",
            "1KiB",
            "--delete",
        ])
        .unwrap();

        let Commands::Scan(args) = cli.command;
        assert_eq!(args.paths.len(), 2);
        assert_eq!(args.strategy, StrategyArg::NameAndSize);
        assert_eq!(args.exclude_dirs, vec!["node_modules".to_string()]);
        assert_eq!(args.min_size, Some(1024));
        assert!(args.delete);
    }

    #[test]
    fn test_scan_requires_a_path() {
        assert!(Cli::try_parse_from(["dupesweep", "scan"]).is_err());
    }

    #[test]
    fn test_strategy_conversion() {
        assert_eq!(Strategy::from(StrategyArg::ContentHash), Strategy::ContentHash);
        assert_eq!(
            Strategy::from(StrategyArg::NameDifferentSize),
            Strategy::NameDifferentSize
        );
    }
}
