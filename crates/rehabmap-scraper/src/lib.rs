pub mod cache;
pub(crate) mod client;
pub mod directory;
pub mod error;
pub(crate) mod fetch;
pub mod geocode;
pub mod pipeline;
pub(crate) mod rate_limit;

pub use cache::{normalize_address, CachedGeocode, GeocodeCache};
pub use directory::{make_provider_key, parse_provider_cards, DirectoryClient};
pub use error::ScraperError;
pub use geocode::{GeocodeClient, GeocodeMatch, GeocodeOptions};
pub use pipeline::{
    run_scrape, ScrapeOutput, ScrapeSettings, ScrapeSummary, DEFAULT_CACHE_FLUSH_EVERY,
};
pub use rate_limit::RetryPolicy;
