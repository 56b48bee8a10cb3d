//! Client for the public provider directory.

mod parse;

pub use parse::{make_provider_key, parse_provider_cards};

use rehabmap_core::ProviderRecord;

use crate::client::build_http_client;
use crate::error::ScraperError;
use crate::fetch::fetch_html;
use crate::rate_limit::RetryPolicy;

/// Fetches the directory search page and turns its cards into records.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl DirectoryClient {
    /// Creates a new directory client.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        retry: RetryPolicy,
    ) -> Result<Self, ScraperError> {
        let client = build_http_client(timeout_secs, user_agent)?;
        Ok(Self { client, retry })
    }

    /// Fetches `url` and parses every provider card on it.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if `url` is not an absolute URL.
    /// - [`ScraperError::NoProviderCards`] if the page parsed but held no
    ///   usable cards. This usually means the markup changed or the page is
    ///   rendered client-side.
    /// - Any fetch error from the HTTP layer once retries are exhausted.
    pub async fn fetch_providers(&self, url: &str) -> Result<Vec<ProviderRecord>, ScraperError> {
        if let Err(e) = reqwest::Url::parse(url) {
            return Err(ScraperError::InvalidUrl {
                url: url.to_owned(),
                reason: e.to_string(),
            });
        }

        let html = fetch_html(&self.client, url, self.retry).await?;
        let records = parse_provider_cards(&html, url);
        if records.is_empty() {
            return Err(ScraperError::NoProviderCards {
                url: url.to_owned(),
            });
        }

        tracing::info!(url, count = records.len(), "parsed provider directory");
        Ok(records)
    }
}
