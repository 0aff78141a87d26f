//! Release discovery from recursive directory listings
//!
//! Mirrors publish an `ls-lR.gz` file describing their whole tree. This
//! module finds the per-release directories in that listing, fetches their
//! `Release` files and turns them into [`ReleaseRecord`]s.
//!
//! # Module Organization
//!
//! - [`types`] - Crawl statistics, crawl state and file entries
//! - [`parser`] - Directory, `total` and file entry line parsing
//! - [`crawler`] - The pull-based [`ListingCrawler`] and the [`ListingSource`] /
//!   [`ReleaseFetcher`] seams
//!
//! # Examples
//!
//! ```rust,no_run
//! use distro_releases::app::listing::{ListingCrawler, ListingSource};
//! use distro_releases::app::{ClientConfig, MirrorClient};
//! use url::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MirrorClient::new(ClientConfig::default())?;
//! let root = Url::parse("https://deb.debian.org/debian/")?;
//! let listing = client.open_listing(&root).await?;
//!
//! let mut crawler = ListingCrawler::new(listing, root, &client);
//! while let Some(release) = crawler.next_release().await {
//!     println!("{}", release);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`ReleaseRecord`]: crate::app::release::ReleaseRecord

pub mod crawler;
pub mod parser;
pub mod types;

pub use crawler::{
    normalize_mirror_root, ListingCrawler, ListingReader, ListingSource, ReleaseFetcher,
};
pub use parser::{is_metadata_entry, parse_file_entry, parse_release_directory, parse_total_line};
pub use types::{CrawlState, CrawlStats, FileEntry};
