//! Pull-based crawler over a recursive directory listing
//!
//! The crawler reads the listing block by block. Whenever a per-release
//! directory contains a `Release` file it fetches that file from the mirror,
//! parses it and hands the record to the caller. Fetches happen one at a
//! time, only when the caller asks for the next release.

use std::pin::Pin;

use async_trait::async_trait;
use futures::stream::{self, Stream};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::{debug, info, warn};
use url::Url;

use super::parser::{is_metadata_entry, parse_file_entry, parse_release_directory, parse_total_line};
use super::types::{CrawlState, CrawlStats};
use crate::app::metadata::parse_release_text;
use crate::app::release::ReleaseRecord;
use crate::constants::listing::METADATA_FILE_NAME;
use crate::errors::{DownloadError, DownloadResult};

/// Source of per-release metadata documents
#[async_trait]
pub trait ReleaseFetcher: Send + Sync {
    /// Fetch the text of the metadata file at `url`
    async fn fetch_release(&self, url: &Url) -> DownloadResult<String>;
}

#[async_trait]
impl<T> ReleaseFetcher for &T
where
    T: ReleaseFetcher + ?Sized,
{
    async fn fetch_release(&self, url: &Url) -> DownloadResult<String> {
        (**self).fetch_release(url).await
    }
}

/// Decompressed directory listing of a mirror
pub type ListingReader = Pin<Box<dyn AsyncBufRead + Send>>;

/// A mirror that can serve both its directory listing and metadata files
#[async_trait]
pub trait ListingSource: ReleaseFetcher {
    /// Open the decompressed recursive directory listing below `mirror_root`
    async fn open_listing(&self, mirror_root: &Url) -> DownloadResult<ListingReader>;
}

/// Ensure a mirror root ends with `/` so relative joins stay below it
pub fn normalize_mirror_root(mut root: Url) -> Url {
    if !root.path().ends_with('/') {
        let path = format!("{}/", root.path());
        root.set_path(&path);
    }
    root
}

/// Crawler producing one release per metadata file found in a listing
///
/// The sequence is finite and cannot be restarted: once the crawler reaches
/// [`CrawlState::Exhausted`] or [`CrawlState::Failed`], [`next_release`]
/// keeps returning `None`.
///
/// [`next_release`]: ListingCrawler::next_release
pub struct ListingCrawler<R, F> {
    lines: Lines<R>,
    fetcher: F,
    mirror_root: Url,
    /// Path of the release directory whose entries are being read
    current_dir: Option<String>,
    in_block: bool,
    state: CrawlState,
    stats: CrawlStats,
}

impl<R, F> ListingCrawler<R, F>
where
    R: AsyncBufRead + Unpin,
    F: ReleaseFetcher,
{
    /// Create a crawler over `listing`, resolving metadata files against
    /// `mirror_root`
    pub fn new(listing: R, mirror_root: Url, fetcher: F) -> Self {
        Self {
            lines: listing.lines(),
            fetcher,
            mirror_root: normalize_mirror_root(mirror_root),
            current_dir: None,
            in_block: false,
            state: CrawlState::Running,
            stats: CrawlStats::default(),
        }
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    pub fn mirror_root(&self) -> &Url {
        &self.mirror_root
    }

    /// Advance to the next release
    ///
    /// Returns `None` when the listing is exhausted or could not be read any
    /// further. Failed metadata fetches are logged and skipped.
    pub async fn next_release(&mut self) -> Option<ReleaseRecord> {
        while !self.state.is_terminal() {
            let line = self.read_line().await?;

            if !self.in_block {
                if line.is_empty() {
                    continue;
                }
                self.start_block(&line).await;
                continue;
            }

            if line.is_empty() {
                self.in_block = false;
                self.current_dir = None;
                continue;
            }

            let Some(dir) = self.current_dir.as_deref() else {
                continue;
            };
            let Some(entry) = parse_file_entry(&line) else {
                self.stats.unparsed_entries += 1;
                debug!("Skipping unparseable entry in {}: {}", dir, line);
                continue;
            };
            if !is_metadata_entry(&entry) {
                continue;
            }

            self.stats.candidates += 1;
            match self.fetch_candidate(dir).await {
                Ok(record) => {
                    self.stats.releases += 1;
                    debug!("Discovered release {} in {}", record, dir);
                    return Some(record);
                }
                Err(e) => {
                    self.stats.fetch_failures += 1;
                    warn!("Skipping release metadata in {}: {}", dir, e);
                }
            }
        }
        None
    }

    /// Turn the crawler into a stream of releases
    pub fn into_stream(self) -> impl Stream<Item = ReleaseRecord> {
        stream::unfold(self, |mut crawler| async move {
            crawler.next_release().await.map(|record| (record, crawler))
        })
    }

    /// Read the next line, moving to a terminal state at EOF or on error
    async fn read_line(&mut self) -> Option<String> {
        match self.lines.next_line().await {
            Ok(Some(line)) => {
                self.stats.lines_read += 1;
                Some(line)
            }
            Ok(None) => {
                self.finish(CrawlState::Exhausted);
                None
            }
            Err(e) => {
                warn!("Directory listing could not be read further: {}", e);
                self.finish(CrawlState::Failed);
                None
            }
        }
    }

    /// Consume a directory line and the `total` line that must follow it
    async fn start_block(&mut self, directory_line: &str) {
        self.stats.directory_blocks += 1;
        self.current_dir = parse_release_directory(directory_line).map(str::to_string);
        if self.current_dir.is_some() {
            self.stats.release_blocks += 1;
        }

        let Some(total_line) = self.read_line().await else {
            return;
        };
        if parse_total_line(&total_line).is_none() {
            warn!(
                "Malformed listing: expected a total line after {:?}, found {:?}",
                directory_line, total_line
            );
            self.finish(CrawlState::Failed);
            return;
        }
        self.in_block = true;
    }

    async fn fetch_candidate(&self, dir: &str) -> DownloadResult<ReleaseRecord> {
        let relative = format!("{}/{}", dir, METADATA_FILE_NAME);
        let url = self
            .mirror_root
            .join(&relative)
            .map_err(|e| DownloadError::InvalidUrl {
                url: relative.clone(),
                error: e.to_string(),
            })?;

        let text = self.fetcher.fetch_release(&url).await?;
        Ok(parse_release_text(&text))
    }

    fn finish(&mut self, state: CrawlState) {
        if self.state.is_terminal() {
            return;
        }
        self.state = state;
        self.current_dir = None;
        self.in_block = false;

        info!(
            "Listing crawl of {} finished: {} releases from {} candidates in {} release directories",
            self.mirror_root,
            self.stats.releases,
            self.stats.candidates,
            self.stats.release_blocks
        );
        if self.stats.fetch_failures > 0 {
            warn!(
                "{} release metadata fetches failed",
                self.stats.fetch_failures
            );
        }
    }
}
