//! One discovery-and-export run
//!
//! A run crawls every configured mirror in turn, merges the releases into a
//! single catalog, sorts it and writes every configured table. All fatal
//! preconditions are checked before the first table is written, so a failed
//! run leaves no partial output behind.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use tokio::io::AsyncBufRead;
use tracing::{info, warn};
use url::Url;

use crate::app::catalog::ReleaseCatalog;
use crate::app::export::export_to_path;
use crate::app::listing::{ListingCrawler, ListingSource, ReleaseFetcher};
use crate::app::release::ReleaseRecord;
use crate::errors::{DiscoveryError, ExportError, ListingError, Result};

/// A mirror to crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorSpec {
    /// Short name used in logs and errors (e.g., "debian")
    pub name: String,
    /// Mirror root URL
    pub url: Url,
}

/// A table to write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    /// Output file, relative to the output directory unless absolute
    pub path: PathBuf,
    /// Architectures exported into this table, in column order
    pub architectures: Vec<String>,
}

/// Runtime settings for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub mirrors: Vec<MirrorSpec>,
    pub tables: Vec<TableSpec>,
    pub output_dir: PathBuf,
    /// Reference date for age-based classification (defaults to today)
    pub today: Option<NaiveDate>,
}

impl RunConfig {
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Outcome of crawling one mirror
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorSummary {
    pub name: String,
    /// Releases discovered on the mirror
    pub releases: usize,
    /// Releases not already announced by an earlier mirror
    pub added: usize,
}

/// Outcome of writing one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    pub path: PathBuf,
    pub rows: usize,
}

/// Outcome of a complete run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub mirrors: Vec<MirrorSummary>,
    /// Releases after merging all mirrors
    pub merged: usize,
    /// Merged releases that are currently relevant
    pub relevant: usize,
    pub tables: Vec<TableSummary>,
}

/// Hooks for reporting crawl progress
pub trait CrawlObserver {
    fn mirror_started(&self, _mirror: &MirrorSpec) {}
    fn release_found(&self, _mirror: &MirrorSpec, _release: &ReleaseRecord) {}
    fn mirror_finished(&self, _mirror: &MirrorSpec, _releases: usize) {}
}

impl CrawlObserver for () {}

/// Drain a crawler into a catalog
pub async fn collect_releases<R, F>(crawler: ListingCrawler<R, F>) -> ReleaseCatalog
where
    R: AsyncBufRead + Unpin,
    F: ReleaseFetcher,
{
    collect_observed(crawler, |_| {}).await
}

async fn collect_observed<R, F>(
    mut crawler: ListingCrawler<R, F>,
    on_release: impl Fn(&ReleaseRecord),
) -> ReleaseCatalog
where
    R: AsyncBufRead + Unpin,
    F: ReleaseFetcher,
{
    let mut catalog = ReleaseCatalog::new();
    while let Some(release) = crawler.next_release().await {
        on_release(&release);
        catalog.insert(release);
    }
    catalog
}

/// Crawl a single mirror
///
/// # Errors
///
/// Returns `ListingError::Open` if the listing cannot be opened and
/// `DiscoveryError::NoReleases` if the crawl finds nothing.
pub async fn discover_mirror<S, O>(
    source: &S,
    mirror: &MirrorSpec,
    observer: &O,
) -> Result<ReleaseCatalog>
where
    S: ListingSource,
    O: CrawlObserver + ?Sized,
{
    observer.mirror_started(mirror);

    let listing = source
        .open_listing(&mirror.url)
        .await
        .map_err(|e| ListingError::Open {
            mirror: mirror.name.clone(),
            source: e,
        })?;

    let crawler = ListingCrawler::new(listing, mirror.url.clone(), source);
    let catalog = collect_observed(crawler, |release| observer.release_found(mirror, release)).await;
    observer.mirror_finished(mirror, catalog.len());

    if catalog.is_empty() {
        return Err(DiscoveryError::NoReleases {
            mirror: mirror.name.clone(),
        }
        .into());
    }

    info!("Discovered {} releases on {}", catalog.len(), mirror.name);
    Ok(catalog)
}

/// Crawl every mirror and merge the results
///
/// # Errors
///
/// Fails on the first mirror that cannot be crawled or yields no releases,
/// and with `DiscoveryError::EmptyCatalog` if nothing remains after merging.
pub async fn discover<S, O>(
    source: &S,
    mirrors: &[MirrorSpec],
    observer: &O,
) -> Result<(ReleaseCatalog, Vec<MirrorSummary>)>
where
    S: ListingSource,
    O: CrawlObserver + ?Sized,
{
    let mut merged = ReleaseCatalog::new();
    let mut summaries = Vec::with_capacity(mirrors.len());

    for mirror in mirrors {
        let catalog = discover_mirror(source, mirror, observer).await?;
        let releases = catalog.len();
        let added = merged.merge(catalog);
        if added < releases {
            info!(
                "{} of {} releases from {} were already known",
                releases - added,
                releases,
                mirror.name
            );
        }
        summaries.push(MirrorSummary {
            name: mirror.name.clone(),
            releases,
            added,
        });
    }

    if merged.is_empty() {
        return Err(DiscoveryError::EmptyCatalog.into());
    }
    Ok((merged, summaries))
}

/// Write every table for a merged catalog
pub fn write_tables(
    catalog: &ReleaseCatalog,
    tables: &[TableSpec],
    output_dir: &Path,
    today: NaiveDate,
) -> Result<Vec<TableSummary>> {
    std::fs::create_dir_all(output_dir).map_err(|source| ExportError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let sorted = catalog.sorted();
    let mut summaries = Vec::with_capacity(tables.len());
    for table in tables {
        let path = output_dir.join(&table.path);
        let rows = export_to_path(
            sorted.iter().copied(),
            &path,
            table.architectures.as_slice(),
            today,
        )?;
        if rows == 0 {
            warn!("Table {} has no rows", path.display());
        }
        summaries.push(TableSummary { path, rows });
    }
    Ok(summaries)
}

/// Perform a complete run
pub async fn run<S, O>(source: &S, config: &RunConfig, observer: &O) -> Result<RunSummary>
where
    S: ListingSource,
    O: CrawlObserver + ?Sized,
{
    let today = config.today();
    let (catalog, mirrors) = discover(source, &config.mirrors, observer).await?;
    let relevant = catalog.relevant_count_on(today);
    info!(
        "Merged {} releases ({} relevant on {})",
        catalog.len(),
        relevant,
        today
    );

    let tables = write_tables(&catalog, &config.tables, &config.output_dir, today)?;

    Ok(RunSummary {
        mirrors,
        merged: catalog.len(),
        relevant,
        tables,
    })
}
