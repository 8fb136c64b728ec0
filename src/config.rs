//! Run configuration shared by the scanner, classifier and reporters.
//!
//! A [`Config`] is built once from the parsed command line and passed by
//! reference through the pipeline; nothing in the core reads process
//! globals or the environment.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use thiserror::Error;

use crate::cli::Cli;

/// Errors raised while building a [`Config`] from the command line.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An include glob failed to compile.
    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        /// The offending pattern as given on the command line
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Immutable settings for one invocation.
#[derive(Debug)]
pub struct Config {
    /// Directory roots to scan, in command-line order
    pub roots: Vec<PathBuf>,
    /// Recurse into subdirectories
    pub recurse: bool,
    /// Follow symbolic links and admit symlinks to regular files
    pub follow_symlinks: bool,
    /// Exclude zero-length files from candidacy
    pub exclude_empty: bool,
    /// Only consider files strictly larger than this many bytes
    pub min_size: Option<u64>,
    /// Print each group of matches on a single line
    pub same_line: bool,
    /// Show file sizes in reports and prompts
    pub show_size: bool,
    /// Emit only the summary
    pub summarize: bool,
    /// Omit the first file of each group in print output
    pub omit_first: bool,
    /// Suppress the progress indicator
    pub quiet: bool,
    /// Run the deletion phase after classification
    pub delete: bool,
    /// Delete without prompting, using the automatic preservation policy
    pub no_prompt: bool,
    read_only_names: HashSet<String>,
    globs: Option<GlobSet>,
}

impl Config {
    /// Build the run configuration from parsed command-line arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidGlob`] if any `-i` pattern fails to
    /// compile. This is fatal before any scan work begins.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let globs = if cli.globs.is_empty() {
            None
        } else {
            let mut builder = GlobSetBuilder::new();
            for pattern in &cli.globs {
                let glob = Glob::new(pattern).map_err(|source| ConfigError::InvalidGlob {
                    pattern: pattern.clone(),
                    source,
                })?;
                builder.add(glob);
            }
            Some(
                builder
                    .build()
                    .map_err(|source| ConfigError::InvalidGlob {
                        pattern: cli.globs.join(", "),
                        source,
                    })?,
            )
        };

        Ok(Self {
            roots: cli.directories.clone(),
            recurse: cli.recurse,
            follow_symlinks: cli.follow_symlinks,
            exclude_empty: cli.exclude_empty,
            min_size: cli.min_size,
            same_line: cli.same_line,
            show_size: cli.show_size,
            summarize: cli.summarize,
            omit_first: cli.omit_first,
            quiet: cli.quiet,
            delete: cli.delete,
            no_prompt: cli.no_prompt,
            read_only_names: cli.read_only_names.iter().cloned().collect(),
            globs,
        })
    }

    /// Whether any `/`- or `\`-separated component of `path` is in the
    /// configured read-only name set.
    #[must_use]
    pub fn is_read_only_path(&self, path: &Path) -> bool {
        if self.read_only_names.is_empty() {
            return false;
        }
        path.to_string_lossy()
            .split(['/', '\\'])
            .filter(|component| !component.is_empty())
            .any(|component| self.read_only_names.contains(component))
    }

    /// Whether `path` passes the include-glob filter.
    ///
    /// With no globs configured every path passes; otherwise at least
    /// one glob must match the full path. Globs use filename-matching
    /// semantics where `*` also crosses path separators.
    #[must_use]
    pub fn glob_matches(&self, path: &Path) -> bool {
        match &self.globs {
            None => true,
            Some(set) => set.is_match(path),
        }
    }

    /// Whether a read-only name set is configured at all.
    #[must_use]
    pub fn has_read_only_names(&self) -> bool {
        !self.read_only_names.is_empty()
    }
}
