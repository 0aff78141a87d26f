//! Core application logic for distro_releases
//!
//! This module contains the release model and classifier, the `Release`
//! metadata parser, the directory listing crawler, the mirror HTTP client,
//! the catalog, the table exporter and the run pipeline.
//!
//! # Examples
//!
//! ```rust,no_run
//! use distro_releases::app::listing::{ListingCrawler, ListingSource};
//! use distro_releases::app::{collect_releases, ClientConfig, MirrorClient};
//! use url::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MirrorClient::new(ClientConfig::default())?;
//! let root = Url::parse("https://deb.debian.org/debian/")?;
//! let listing = client.open_listing(&root).await?;
//!
//! let catalog = collect_releases(ListingCrawler::new(listing, root, &client)).await;
//! for release in catalog.sorted() {
//!     println!("{} relevant={}", release, release.is_relevant());
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod client;
pub mod export;
pub mod listing;
pub mod metadata;
pub mod pipeline;
pub mod release;

// Re-export main public API
pub use catalog::ReleaseCatalog;
pub use client::{ClientConfig, MirrorClient};
pub use export::{build_rows, export_rows, export_to_path, ExportRow};
pub use listing::{CrawlState, CrawlStats, ListingCrawler, ListingSource, ReleaseFetcher};
pub use metadata::{parse_release_lines, parse_release_text};
pub use pipeline::{
    collect_releases, discover, run, CrawlObserver, MirrorSpec, RunConfig, RunSummary, TableSpec,
};
pub use release::{ReleaseFields, ReleaseRecord};
