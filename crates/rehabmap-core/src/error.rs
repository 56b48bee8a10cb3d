use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Errors raised while reading or writing the provider dataset file.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open provider dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed provider dataset {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("provider dataset {path} has no \"{column}\" column")]
    MissingColumn { path: String, column: String },
}

/// Errors raised while persisting client state.
///
/// Loading never fails; a missing or corrupt entry falls back to its default.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write state entry {key} at {path}: {source}")]
    Io {
        key: String,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize state entry {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
