//! Command-line interface definitions for dupescan.
//!
//! All options are short flags in the traditional style of duplicate
//! finders, defined with the clap derive API. Positional arguments are
//! the directory roots to scan.
//!
//! # Example
//!
//! ```bash
//! # Report duplicates under two trees, recursively
//! dupescan -r ~/Pictures ~/Backups
//!
//! # Only .jpg files, one group per line, sizes shown
//! dupescan -r -i '*.jpg' -1 -S ~/Pictures
//!
//! # Delete duplicates, treating anything under .git as untouchable
//! dupescan -r -R .git -d ~/src
//! ```

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Duplicate file finder.
///
/// Scans the given directories for files with byte-identical content.
/// Candidate files are bucketed by size, then refined through a partial
/// checksum, a full checksum and a final byte-by-byte comparison, so no
/// two files are ever reported equal on checksums alone.
#[derive(Debug, Parser)]
#[command(name = "dupescan")]
#[command(author, version, about, long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Recurse into subdirectories encountered within each directory
    #[arg(short = 'r')]
    pub recurse: bool,

    /// Treat any path with a component matching NAME as read only
    /// (repeatable); read-only files are reported but never deleted
    #[arg(short = 'R', value_name = "NAME")]
    pub read_only_names: Vec<String>,

    /// Only include files matching GLOB (repeatable); when given,
    /// files must match at least one glob
    #[arg(short = 'i', value_name = "GLOB")]
    pub globs: Vec<String>,

    /// Follow symbolic links during the scan
    #[arg(short = 's')]
    pub follow_symlinks: bool,

    /// Exclude zero-length files from consideration
    #[arg(short = 'n')]
    pub exclude_empty: bool,

    /// Omit the first file in each set of matches
    #[arg(short = 'f')]
    pub omit_first: bool,

    /// List each set of matches on a single line
    #[arg(short = '1')]
    pub same_line: bool,

    /// Show the size of duplicate files
    #[arg(short = 'S')]
    pub show_size: bool,

    /// Summarize duplicate information instead of listing groups
    #[arg(short = 'm')]
    pub summarize: bool,

    /// Only consider files strictly larger than MIN bytes
    #[arg(short = 'M', value_name = "MIN")]
    pub min_size: Option<u64>,

    /// Hide the progress indicator
    #[arg(short = 'q')]
    pub quiet: bool,

    /// Prompt for files to preserve and delete all others
    #[arg(short = 'd')]
    pub delete: bool,

    /// Together with -d, delete without prompting, preserving files
    /// according to the automatic policy
    #[arg(short = 'N')]
    pub no_prompt: bool,

    /// Print version and exit
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    pub version: (),

    /// Increase log verbosity (repeatable)
    #[arg(long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Directories to scan for duplicates
    #[arg(value_name = "DIRECTORY", required = true, num_args = 1..)]
    pub directories: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["dupescan", "/some/dir"]).unwrap();
        assert_eq!(cli.directories, vec![PathBuf::from("/some/dir")]);
        assert!(!cli.recurse);
        assert!(!cli.delete);
        assert!(cli.min_size.is_none());
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = Cli::try_parse_from([
            "dupescan", "-r", "-s", "-n", "-f", "-1", "-S", "-m", "-q", "-d", "-N", "-M", "4096",
            "/a", "/b",
        ])
        .unwrap();
        assert!(cli.recurse);
        assert!(cli.follow_symlinks);
        assert!(cli.exclude_empty);
        assert!(cli.omit_first);
        assert!(cli.same_line);
        assert!(cli.show_size);
        assert!(cli.summarize);
        assert!(cli.quiet);
        assert!(cli.delete);
        assert!(cli.no_prompt);
        assert_eq!(cli.min_size, Some(4096));
        assert_eq!(cli.directories.len(), 2);
    }

    #[test]
    fn test_parse_repeatable_options() {
        let cli = Cli::try_parse_from([
            "dupescan", "-R", ".git", "-R", "backup", "-i", "*.txt", "-i", "*.log", "/dir",
        ])
        .unwrap();
        assert_eq!(cli.read_only_names, vec![".git", "backup"]);
        assert_eq!(cli.globs, vec!["*.txt", "*.log"]);
    }

    #[test]
    fn test_missing_directory_is_error() {
        assert!(Cli::try_parse_from(["dupescan"]).is_err());
        assert!(Cli::try_parse_from(["dupescan", "-r"]).is_err());
    }

    #[test]
    fn test_unknown_option_is_error() {
        assert!(Cli::try_parse_from(["dupescan", "-x", "/dir"]).is_err());
    }

    #[test]
    fn test_invalid_min_size_is_error() {
        assert!(Cli::try_parse_from(["dupescan", "-M", "lots", "/dir"]).is_err());
    }

    #[test]
    fn test_version_flag_exits_early() {
        // ArgAction::Version surfaces as an error from try_parse_from
        let err = Cli::try_parse_from(["dupescan", "-v"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_help_flag_exits_early() {
        let err = Cli::try_parse_from(["dupescan", "-h"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_verbose_count() {
        let cli = Cli::try_parse_from(["dupescan", "--verbose", "--verbose", "/d"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
