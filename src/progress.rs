//! Progress reporting on the error channel using indicatif.
//!
//! Two phases are shown: a spinner while the file list is built and a
//! bar while buckets are classified. The classification bar counts
//! files whose final classification has been decided out of the total
//! candidate population. With `-q` both return hidden bars, so call
//! sites never branch on quiet mode.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Factory for the per-phase progress bars.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    quiet: bool,
}

impl Progress {
    /// Create a progress factory.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Spinner shown while the scanner builds the file list.
    #[must_use]
    pub fn scan_spinner(&self) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {msg} {pos} entries")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Building file list");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    /// Bar shown while size buckets are refined into duplicate groups.
    #[must_use]
    pub fn classify_bar(&self, total: u64) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::with_template("[{bar:40}] {pos}/{len} ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█>-"),
        );
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_bars_are_hidden() {
        let progress = Progress::new(true);
        assert!(progress.scan_spinner().is_hidden());
        assert!(progress.classify_bar(10).is_hidden());
    }

    #[test]
    fn test_classify_bar_length() {
        let progress = Progress::new(true);
        let bar = progress.classify_bar(42);
        assert_eq!(bar.length(), Some(42));
    }
}
