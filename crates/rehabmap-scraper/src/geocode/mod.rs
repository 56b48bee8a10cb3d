//! Nominatim geocoding client.
//!
//! Only the first candidate of each `/search` response is used.

mod types;

pub use types::{GeocodeMatch, GeocodeOptions};

use rehabmap_core::Coordinate;

use crate::client::{build_http_client, check_status};
use crate::error::ScraperError;
use crate::rate_limit::{retry_with_backoff, RetryPolicy};
use types::NominatimPlace;

/// Client for a Nominatim-compatible geocoder.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl GeocodeClient {
    /// Creates a new geocoding client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        retry: RetryPolicy,
    ) -> Result<Self, ScraperError> {
        let client = build_http_client(timeout_secs, user_agent)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            retry,
        })
    }

    /// Resolves `query` to its best match.
    ///
    /// Returns `Ok(None)` when the geocoder has no candidate.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if the base URL cannot carry a query.
    /// - [`ScraperError::Deserialize`] if the body is not a Nominatim result list.
    /// - [`ScraperError::InvalidCoordinate`] if the first candidate's `lat` or
    ///   `lon` is not a finite number.
    /// - Any HTTP error once retries are exhausted.
    pub async fn search(
        &self,
        query: &str,
        options: &GeocodeOptions,
    ) -> Result<Option<GeocodeMatch>, ScraperError> {
        let url = self.search_url(query, options)?;
        let url = url.as_str();

        let body = retry_with_backoff(self.retry, || async move {
            let response = self
                .client
                .get(url)
                .header(reqwest::header::ACCEPT, "application/json")
                .send()
                .await?;
            let response = check_status(response, url)?;
            Ok::<_, ScraperError>(response.text().await?)
        })
        .await?;

        let places: Vec<NominatimPlace> =
            serde_json::from_str(&body).map_err(|source| ScraperError::Deserialize {
                context: format!("geocode response for \"{query}\""),
                source,
            })?;

        let Some(place) = places.into_iter().next() else {
            tracing::debug!(query, "geocoder returned no candidates");
            return Ok(None);
        };

        for value in [&place.lat, &place.lon] {
            if Coordinate::parse(value).is_none() {
                return Err(ScraperError::InvalidCoordinate {
                    query: query.to_owned(),
                    value: value.clone(),
                });
            }
        }

        tracing::debug!(query, lat = %place.lat, lon = %place.lon, "geocoded address");
        Ok(Some(GeocodeMatch {
            latitude: place.lat.trim().to_owned(),
            longitude: place.lon.trim().to_owned(),
            display_name: place.display_name,
        }))
    }

    fn search_url(
        &self,
        query: &str,
        options: &GeocodeOptions,
    ) -> Result<reqwest::Url, ScraperError> {
        let raw = format!("{}/search", self.base_url);
        let mut url = reqwest::Url::parse(&raw).map_err(|e| ScraperError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("q", query)
                .append_pair("format", "json")
                .append_pair("limit", "1");
            if let Some(country) = options.country.as_deref() {
                pairs.append_pair("countrycodes", country);
            }
            if let Some(viewbox) = options.viewbox {
                pairs
                    .append_pair("viewbox", &viewbox.to_viewbox())
                    .append_pair("bounded", "1");
            }
        }

        Ok(url)
    }
}
