use std::path::PathBuf;

use crate::app_config::{AppConfig, BoundingBox, Environment};
use crate::ConfigError;

pub const DEFAULT_DIRECTORY_URL: &str =
    "https://www.sira.nsw.gov.au/information-search/rehab-provider/search";
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("REHABMAP_ENV", "development"))?;
    let log_level = or_default("REHABMAP_LOG_LEVEL", "info");

    let data_path = PathBuf::from(or_default("REHABMAP_DATA_PATH", "./data/providers.csv"));
    let state_dir = PathBuf::from(or_default("REHABMAP_STATE_DIR", "./.rehabmap"));
    let geocode_cache_path = PathBuf::from(or_default(
        "REHABMAP_GEOCODE_CACHE_PATH",
        "./data/geocode_cache.json",
    ));

    let directory_url = or_default("REHABMAP_DIRECTORY_URL", DEFAULT_DIRECTORY_URL);
    let geocoder_url = or_default("REHABMAP_GEOCODER_URL", DEFAULT_GEOCODER_URL);

    // An explicitly empty country disables the country filter.
    let geocode_country = Some(or_default("REHABMAP_GEOCODE_COUNTRY", "au"))
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty());

    let geocode_viewbox = match lookup("REHABMAP_GEOCODE_VIEWBOX") {
        Ok(raw) if !raw.trim().is_empty() => Some(
            BoundingBox::parse(&raw).map_err(|reason| invalid("REHABMAP_GEOCODE_VIEWBOX", reason))?,
        ),
        _ => None,
    };

    let nearby_limit = parse_usize("REHABMAP_NEARBY_LIMIT", "10")?;
    if nearby_limit == 0 {
        return Err(invalid(
            "REHABMAP_NEARBY_LIMIT",
            "must be at least 1".to_string(),
        ));
    }

    let scraper_request_timeout_secs = parse_u64("REHABMAP_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default(
        "REHABMAP_SCRAPER_USER_AGENT",
        "rehabmap/0.1 (provider-directory)",
    );
    let scraper_inter_request_delay_ms =
        parse_u64("REHABMAP_SCRAPER_INTER_REQUEST_DELAY_MS", "1100")?;
    let scraper_max_retries = parse_u32("REHABMAP_SCRAPER_MAX_RETRIES", "3")?;
    let scraper_retry_backoff_base_secs =
        parse_u64("REHABMAP_SCRAPER_RETRY_BACKOFF_BASE_SECS", "2")?;

    Ok(AppConfig {
        env,
        log_level,
        data_path,
        state_dir,
        geocode_cache_path,
        directory_url,
        geocoder_url,
        geocode_country,
        geocode_viewbox,
        nearby_limit,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_inter_request_delay_ms,
        scraper_max_retries,
        scraper_retry_backoff_base_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "REHABMAP_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
