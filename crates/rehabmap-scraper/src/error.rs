use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("bot challenge page returned by {url}")]
    BotChallenge { url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("no provider cards found at {url}; the directory layout may have changed")]
    NoProviderCards { url: String },

    #[error("geocoder returned an unusable coordinate for \"{query}\": {value}")]
    InvalidCoordinate { query: String, value: String },

    #[error("geocode cache I/O error at {path}: {source}")]
    CacheIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
