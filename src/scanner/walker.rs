//! Recursive directory walker that seeds the candidate store.

use std::fs::{self, Metadata};
use std::path::Path;

use indicatif::ProgressBar;

use super::file_identity;
use crate::config::Config;
use crate::duplicates::{FileRecord, FileStore};
use crate::progress::Progress;

/// Walks directory roots and inserts eligible files into a
/// [`FileStore`] as singleton groups keyed by size.
///
/// A file is eligible when it is strictly larger than the configured
/// minimum (if one is set), is a regular file (or a symlink while
/// symlink-following is enabled), matches the include globs, and is
/// non-empty unless empty files are admitted.
pub struct Scanner<'a> {
    config: &'a Config,
    spinner: ProgressBar,
    candidates: usize,
    read_only_candidates: usize,
}

impl<'a> Scanner<'a> {
    /// Create a scanner sharing the run configuration; one spinner
    /// spans all roots.
    #[must_use]
    pub fn new(config: &'a Config, progress: &Progress) -> Self {
        Self {
            config,
            spinner: progress.scan_spinner(),
            candidates: 0,
            read_only_candidates: 0,
        }
    }

    /// Scan one root directory. The root is read-only when any of its
    /// own path components matches the configured name set; the flag
    /// propagates to every descendant.
    pub fn scan_tree(&mut self, store: &mut FileStore, root: &Path) {
        let read_only = self.config.is_read_only_path(root);
        self.scan_dir(store, root, read_only);
    }

    fn scan_dir(&mut self, store: &mut FileStore, dir: &Path, read_only: bool) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                log::error!("could not open directory {}: {}", dir.display(), err);
                return;
            }
        };

        for entry in entries {
            let Ok(entry) = entry else {
                continue;
            };
            self.spinner.inc(1);

            let path = entry.path();
            // Both stats must succeed; otherwise the entry is skipped
            let Ok(meta) = fs::metadata(&path) else {
                continue;
            };
            let Ok(link_meta) = fs::symlink_metadata(&path) else {
                continue;
            };

            let name = entry.file_name();
            let own_read_only = read_only || self.config.is_read_only_path(Path::new(&name));

            if meta.is_dir() {
                let descend = self.config.recurse
                    && (self.config.follow_symlinks || !link_meta.file_type().is_symlink());
                if descend {
                    self.scan_dir(store, &path, own_read_only);
                }
                continue;
            }

            if !self.is_candidate(&meta, &link_meta, &path) {
                continue;
            }

            let (device, inode) = file_identity(&meta);
            let mut record = FileRecord::new(path, meta.len(), own_read_only);
            record.device = device;
            record.inode = inode;
            record.modified = meta.modified().ok();
            store.add(record);

            self.candidates += 1;
            if own_read_only {
                self.read_only_candidates += 1;
            }
        }
    }

    fn is_candidate(&self, meta: &Metadata, link_meta: &Metadata, path: &Path) -> bool {
        let size = meta.len();
        if let Some(min) = self.config.min_size {
            if size <= min {
                return false;
            }
        }
        let file_type = link_meta.file_type();
        if !(file_type.is_file() || (file_type.is_symlink() && self.config.follow_symlinks)) {
            return false;
        }
        if !self.config.glob_matches(path) {
            return false;
        }
        if size == 0 && self.config.exclude_empty {
            return false;
        }
        true
    }

    /// Finish the scan phase: clears the spinner and logs totals.
    pub fn finish(self) {
        self.spinner.finish_and_clear();
        log::info!("found {} candidate file(s)", self.candidates);
        if self.config.has_read_only_names() {
            log::info!("{} candidate(s) are read only", self.read_only_candidates);
        }
    }

    /// Number of candidates admitted so far.
    #[must_use]
    pub fn candidate_count(&self) -> usize {
        self.candidates
    }

    /// Number of admitted candidates marked read-only.
    #[must_use]
    pub fn read_only_count(&self) -> usize {
        self.read_only_candidates
    }
}
