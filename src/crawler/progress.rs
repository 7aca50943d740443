// file: src/crawler/progress.rs
// description: crawl counters and an optional stderr spinner
// reference: uses indicatif for progress display and tracks per-entry outcomes

use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub entries_listed: usize,
    pub files_rendered: usize,
    pub entries_filtered: usize,
    pub non_files: usize,
    pub metadata_failures: usize,
    pub read_failures: usize,
    pub lines_written: u64,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn soft_failures(&self) -> usize {
        self.metadata_failures + self.read_failures
    }

    pub fn summary(&self) -> String {
        format!(
            "{} files rendered ({} lines), {} filtered, {} non-file entries, {} failures",
            self.files_rendered,
            self.lines_written,
            self.entries_filtered,
            self.non_files,
            self.soft_failures()
        )
    }
}

/// Spinner drawn on stderr; a hidden one when disabled so callers never branch.
pub struct CrawlProgress {
    bar: ProgressBar,
    start_time: Instant,
}

impl CrawlProgress {
    pub fn new(enabled: bool) -> Self {
        let bar = if enabled {
            let bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} entries {msg}")
            {
                bar.set_style(style);
            }
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        } else {
            ProgressBar::hidden()
        };

        Self {
            bar,
            start_time: Instant::now(),
        }
    }

    pub fn set_total(&self, total: usize) {
        self.bar.set_length(total as u64);
    }

    pub fn entry(&self, path: &str) {
        self.bar.inc(1);
        self.bar.set_message(path.to_string());
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for CrawlProgress {
    fn drop(&mut self) {
        self.finish();
    }
}
