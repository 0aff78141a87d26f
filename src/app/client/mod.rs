//! HTTP client for distribution mirrors
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `http`: Rate-limited requests with status checking
//!
//! [`MirrorClient`] opens the decompressed directory listing of a mirror and
//! fetches individual `Release` files for the listing crawler.

use std::io;

use async_compression::tokio::bufread::GzipDecoder;
use async_trait::async_trait;
use futures::TryStreamExt;
use tokio::io::BufReader;
use tokio_util::io::StreamReader;
use url::Url;

use crate::app::listing::{normalize_mirror_root, ListingReader, ListingSource, ReleaseFetcher};
use crate::constants::listing::LISTING_PATH;
use crate::errors::{DownloadError, DownloadResult};

pub mod config;
pub mod http;

pub use config::ClientConfig;

use http::HttpHandler;

/// HTTP client for reading distribution mirrors
#[derive(Debug)]
pub struct MirrorClient {
    http_handler: HttpHandler,
}

impl MirrorClient {
    /// Creates a new MirrorClient
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if the HTTP client or rate limiter cannot be
    /// built
    pub fn new(config: ClientConfig) -> DownloadResult<Self> {
        let client = config.build_http_client()?;
        let http_handler = HttpHandler::new(client, config.rate_limit_rps)?;

        Ok(Self { http_handler })
    }

    /// URL of the compressed directory listing below `mirror_root`
    pub fn listing_url(mirror_root: &Url) -> DownloadResult<Url> {
        normalize_mirror_root(mirror_root.clone())
            .join(LISTING_PATH)
            .map_err(|e| DownloadError::InvalidUrl {
                url: format!("{}{}", mirror_root, LISTING_PATH),
                error: e.to_string(),
            })
    }
}

#[async_trait]
impl ReleaseFetcher for MirrorClient {
    async fn fetch_release(&self, url: &Url) -> DownloadResult<String> {
        self.http_handler.get_text(url).await
    }
}

#[async_trait]
impl ListingSource for MirrorClient {
    /// Open the decompressed directory listing of a mirror
    ///
    /// The body is decompressed while it downloads; nothing is buffered
    /// beyond the reader's internal buffer.
    async fn open_listing(&self, mirror_root: &Url) -> DownloadResult<ListingReader> {
        let url = Self::listing_url(mirror_root)?;
        tracing::info!("Opening directory listing {}", url);

        let response = self.http_handler.get_response(&url).await?;
        let body = response
            .bytes_stream()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e));
        let reader = StreamReader::new(Box::pin(body));

        Ok(Box::pin(BufReader::new(GzipDecoder::new(reader))))
    }
}
