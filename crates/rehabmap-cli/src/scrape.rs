use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use rehabmap_core::{write_providers, AppConfig};
use rehabmap_scraper::{
    run_scrape, DirectoryClient, GeocodeClient, GeocodeOptions, RetryPolicy, ScrapeSettings,
    DEFAULT_CACHE_FLUSH_EVERY,
};

fn retry_policy(config: &AppConfig) -> RetryPolicy {
    RetryPolicy {
        max_retries: config.scraper_max_retries,
        backoff_base_secs: config.scraper_retry_backoff_base_secs,
    }
}

/// Scrape the directory into the provider dataset.
///
/// With `dry_run` the directory is fetched and parsed but nothing is
/// geocoded or written.
///
/// # Errors
///
/// Returns an error if the directory cannot be fetched or parsed, or the
/// dataset cannot be written.
pub(crate) async fn run_scrape_command(
    config: &AppConfig,
    dry_run: bool,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let directory = DirectoryClient::new(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
        retry_policy(config),
    )?;

    if dry_run {
        let records = directory
            .fetch_providers(&config.directory_url)
            .await
            .with_context(|| format!("failed to scrape {}", config.directory_url))?;
        println!("[dry-run] found {} providers at {}", records.len(), config.directory_url);
        for record in &records {
            println!(
                "  {:<48} {:<20} {}",
                record.company_name, record.suburb, record.postcode
            );
        }
        return Ok(());
    }

    let geocoder = GeocodeClient::new(
        &config.geocoder_url,
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
        retry_policy(config),
    )?;
    let settings = ScrapeSettings {
        directory_url: config.directory_url.clone(),
        geocode_options: GeocodeOptions {
            country: config.geocode_country.clone(),
            viewbox: config.geocode_viewbox,
        },
        inter_request_delay: Duration::from_millis(config.scraper_inter_request_delay_ms),
        cache_path: Some(config.geocode_cache_path.clone()),
        flush_every: DEFAULT_CACHE_FLUSH_EVERY,
    };

    let scraped = run_scrape(&directory, &geocoder, &settings)
        .await
        .with_context(|| format!("failed to scrape {}", config.directory_url))?;

    let path = output.unwrap_or(config.data_path.as_path());
    write_providers(path, &scraped.records)
        .with_context(|| format!("failed to write {}", path.display()))?;

    let summary = scraped.summary;
    println!(
        "wrote {} providers to {} ({} from cache, {} looked up, {} without coordinates)",
        summary.cards,
        path.display(),
        summary.cache_hits,
        summary.live_lookups,
        summary.misses
    );
    Ok(())
}
