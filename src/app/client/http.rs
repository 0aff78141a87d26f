//! Core HTTP operations with rate limiting
//!
//! Requests to a mirror are paced by a rate limiter and checked for a
//! successful status. Failed requests are not retried.

use std::num::NonZeroU32;

use governor::{clock::DefaultClock, state::InMemoryState, Quota, RateLimiter};
use reqwest::Client;
use url::Url;

use crate::errors::{DownloadError, DownloadResult};

type DirectRateLimiter = RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>;

/// HTTP operations handler
#[derive(Debug)]
pub struct HttpHandler {
    client: Client,
    rate_limiter: DirectRateLimiter,
}

impl HttpHandler {
    /// Creates a new HttpHandler with the given client and rate limiting
    ///
    /// # Errors
    ///
    /// Returns `DownloadError::InvalidRateLimit` if `rate_limit_rps` is zero
    pub fn new(client: Client, rate_limit_rps: u32) -> DownloadResult<Self> {
        let rate_limiter = Self::build_rate_limiter(rate_limit_rps)?;
        Ok(Self {
            client,
            rate_limiter,
        })
    }

    fn build_rate_limiter(rate_limit_rps: u32) -> DownloadResult<DirectRateLimiter> {
        let rps = NonZeroU32::new(rate_limit_rps).ok_or(DownloadError::InvalidRateLimit {
            rps: rate_limit_rps,
        })?;
        Ok(RateLimiter::direct(Quota::per_second(rps)))
    }

    /// Fetches the HTTP response, failing on non-success status codes
    ///
    /// The body is not read, so it can be streamed by the caller.
    pub async fn get_response(&self, url: &Url) -> DownloadResult<reqwest::Response> {
        self.rate_limiter.until_ready().await;

        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::ServerError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        tracing::debug!("Fetched response: {}", url);
        Ok(response)
    }

    /// Fetches a text document
    pub async fn get_text(&self, url: &Url) -> DownloadResult<String> {
        let response = self.get_response(url).await?;
        let text = response.text().await?;
        Ok(text)
    }

    /// Get a reference to the underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }
}
