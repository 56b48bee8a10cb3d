//! Directory scrape followed by sequential geocoding of each provider.

use std::path::PathBuf;
use std::time::Duration;

use rehabmap_core::ProviderRecord;

use crate::cache::GeocodeCache;
use crate::directory::DirectoryClient;
use crate::error::ScraperError;
use crate::geocode::{GeocodeClient, GeocodeOptions};

/// Save the cache after this many live lookups so an interrupted run keeps
/// most of its work.
pub const DEFAULT_CACHE_FLUSH_EVERY: usize = 25;

#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    pub directory_url: String,
    pub geocode_options: GeocodeOptions,
    /// Pause between live geocoder requests.
    pub inter_request_delay: Duration,
    /// Cache location; `None` disables caching.
    pub cache_path: Option<PathBuf>,
    pub flush_every: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub cards: usize,
    pub cache_hits: usize,
    pub live_lookups: usize,
    /// Records left without coordinates, from a cached or live miss or a failed lookup.
    pub misses: usize,
}

#[derive(Debug, Clone)]
pub struct ScrapeOutput {
    pub records: Vec<ProviderRecord>,
    pub summary: ScrapeSummary,
}

/// Scrapes the directory and geocodes every record's business address.
///
/// Geocoding failures for a single record are logged and leave its
/// coordinates empty. Cache save failures are logged too; the geocoded
/// records are still returned.
///
/// # Errors
///
/// Returns the directory fetch or parse error.
pub async fn run_scrape(
    directory: &DirectoryClient,
    geocoder: &GeocodeClient,
    settings: &ScrapeSettings,
) -> Result<ScrapeOutput, ScraperError> {
    let mut records = directory.fetch_providers(&settings.directory_url).await?;
    let mut cache = settings
        .cache_path
        .as_deref()
        .map(GeocodeCache::load)
        .unwrap_or_default();

    let mut summary = ScrapeSummary {
        cards: records.len(),
        ..ScrapeSummary::default()
    };
    let mut unsaved = 0usize;

    for record in &mut records {
        let address = record.business_address.trim().to_owned();
        if address.is_empty() {
            tracing::warn!(
                company = %record.company_name,
                "provider has no address; not geocoding"
            );
            summary.misses += 1;
            continue;
        }

        let outcome = if let Some(cached) = cache.get(&address) {
            summary.cache_hits += 1;
            cached.result.clone()
        } else {
            if summary.live_lookups > 0 && !settings.inter_request_delay.is_zero() {
                tokio::time::sleep(settings.inter_request_delay).await;
            }
            summary.live_lookups += 1;

            match geocoder.search(&address, &settings.geocode_options).await {
                Ok(result) => {
                    cache.insert(&address, result.clone());
                    unsaved += 1;
                    result
                }
                Err(e) => {
                    // Not cached: a transient failure should be retried next run.
                    tracing::warn!(
                        company = %record.company_name,
                        address = %address,
                        error = %e,
                        "geocoding failed"
                    );
                    None
                }
            }
        };

        match outcome {
            Some(found) => {
                record.latitude = found.latitude;
                record.longitude = found.longitude;
            }
            None => {
                tracing::debug!(
                    company = %record.company_name,
                    address = %address,
                    "no coordinates for provider"
                );
                summary.misses += 1;
            }
        }

        if let Some(path) = settings.cache_path.as_deref() {
            if settings.flush_every > 0 && unsaved >= settings.flush_every {
                if let Err(e) = cache.save(path) {
                    tracing::warn!(error = %e, "intermediate geocode cache save failed");
                }
                unsaved = 0;
            }
        }
    }

    if let Some(path) = settings.cache_path.as_deref() {
        if let Err(e) = cache.save(path) {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "geocode cache save failed; lookups will repeat next run"
            );
        }
    }

    tracing::info!(
        cards = summary.cards,
        cache_hits = summary.cache_hits,
        live_lookups = summary.live_lookups,
        misses = summary.misses,
        "scrape complete"
    );

    Ok(ScrapeOutput { records, summary })
}
