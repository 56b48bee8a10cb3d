use rehabmap_core::{build_map_view, AppConfig, SearchPoint, SessionAction};
use rehabmap_scraper::{GeocodeClient, GeocodeMatch, GeocodeOptions, RetryPolicy, ScraperError};

use crate::state::{load_dataset, open_session};
use crate::{render, OutputFormat};

/// Geocode `address` and show the providers nearest to it.
///
/// The lookup runs through the session reducer: the query is recorded in
/// history on submit and the result is applied only to the search it belongs
/// to. A geocoder miss or failure places no search marker and still prints
/// the map markers.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded or the search history
/// cannot be saved.
pub(crate) async fn run_search(
    config: &AppConfig,
    address: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let dataset = load_dataset(config)?;
    let mut session = open_session(config);

    let Some(generation) = session
        .dispatch(SessionAction::SearchSubmitted {
            query: address.to_string(),
        })?
        .pending_generation()
    else {
        anyhow::bail!("search did not start");
    };

    let point = search_point(address, geocode(config, address).await);

    let state = session.dispatch(SessionAction::SearchResolved { generation, point })?;
    let view = build_map_view(&dataset.providers, state, config.nearby_limit);

    match format {
        OutputFormat::Table => {
            if let Some(search) = view.search_point {
                println!(
                    "Nearest providers to {} ({:.5}, {:.5})",
                    search.label, search.point.lat, search.point.lng
                );
                println!();
                render::print_nearby(&view);
            } else {
                render::print_markers(&view);
            }
        }
        OutputFormat::Geojson => render::print_geojson(&view)?,
    }
    Ok(())
}

/// The search marker for a lookup result. Misses and failures are logged and
/// place no marker.
fn search_point(
    address: &str,
    result: Result<Option<GeocodeMatch>, ScraperError>,
) -> Option<SearchPoint> {
    match result {
        Ok(Some(found)) => found.to_search_point(),
        Ok(None) => {
            tracing::warn!(address, "geocoder found no match");
            None
        }
        Err(e) => {
            tracing::warn!(address, error = %e, "geocoding failed");
            None
        }
    }
}

async fn geocode(
    config: &AppConfig,
    address: &str,
) -> Result<Option<GeocodeMatch>, ScraperError> {
    let client = GeocodeClient::new(
        &config.geocoder_url,
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
        RetryPolicy {
            max_retries: config.scraper_max_retries,
            backoff_base_secs: config.scraper_retry_backoff_base_secs,
        },
    )?;
    let options = GeocodeOptions {
        country: config.geocode_country.clone(),
        viewbox: config.geocode_viewbox,
    };
    client.search(address, &options).await
}
