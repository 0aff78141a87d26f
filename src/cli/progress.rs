//! Progress display for mirror crawls
//!
//! Crawls are sequential and their length is unknown up front, so progress
//! is a single spinner showing the current mirror and the number of releases
//! discovered on it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::app::{CrawlObserver, MirrorSpec, ReleaseRecord};

/// Configuration for progress display
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Draw the spinner at all
    pub enabled: bool,
    /// Spinner tick interval
    pub tick_interval: Duration,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tick_interval: Duration::from_millis(120),
        }
    }
}

/// Spinner reporting crawl progress on stderr
pub struct CrawlProgress {
    spinner: ProgressBar,
    found: AtomicUsize,
}

impl CrawlProgress {
    pub fn new(config: ProgressConfig) -> Self {
        let spinner = if config.enabled {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };

        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            spinner.set_style(style.tick_strings(&["◐", "◓", "◑", "◒", "●"]));
        }
        if config.enabled {
            spinner.enable_steady_tick(config.tick_interval);
        }

        Self {
            spinner,
            found: AtomicUsize::new(0),
        }
    }

    /// A spinner that never draws
    pub fn hidden() -> Self {
        Self::new(ProgressConfig {
            enabled: false,
            ..ProgressConfig::default()
        })
    }

    /// Releases found on the mirror currently being crawled
    pub fn found(&self) -> usize {
        self.found.load(Ordering::Relaxed)
    }

    /// Stop the spinner and remove it from the terminal
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl CrawlObserver for CrawlProgress {
    fn mirror_started(&self, mirror: &MirrorSpec) {
        self.found.store(0, Ordering::Relaxed);
        self.spinner
            .set_message(format!("Crawling {} ({})", mirror.name, mirror.url));
    }

    fn release_found(&self, mirror: &MirrorSpec, release: &ReleaseRecord) {
        let found = self.found.fetch_add(1, Ordering::Relaxed) + 1;
        self.spinner.set_message(format!(
            "Crawling {}: {} releases, latest {}",
            mirror.name, found, release
        ));
    }

    fn mirror_finished(&self, mirror: &MirrorSpec, releases: usize) {
        debug!("Finished crawling {}: {} releases", mirror.name, releases);
        if !self.spinner.is_hidden() {
            self.spinner
                .println(format!("✅ {}: {} releases", mirror.name, releases));
        }
    }
}

impl Drop for CrawlProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}
