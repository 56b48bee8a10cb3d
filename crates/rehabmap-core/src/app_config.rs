use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Geographic bounds passed to the geocoder to keep matches in the service area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Parses `min_lng,min_lat,max_lng,max_lat`.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the text does not hold four finite
    /// numbers or the minimums exceed the maximums.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let parts: Vec<f64> = raw
            .split(',')
            .map(|p| p.trim().parse::<f64>().map_err(|e| format!("'{p}': {e}")))
            .collect::<Result<_, _>>()?;

        let &[min_lng, min_lat, max_lng, max_lat] = parts.as_slice() else {
            return Err(format!("expected 4 comma-separated numbers, got {}", parts.len()));
        };
        if parts.iter().any(|v| !v.is_finite()) {
            return Err("bounds must be finite".to_string());
        }
        if min_lng > max_lng || min_lat > max_lat {
            return Err("minimum bound exceeds maximum bound".to_string());
        }

        Ok(Self {
            min_lng,
            min_lat,
            max_lng,
            max_lat,
        })
    }

    /// Renders the box in Nominatim `viewbox` order.
    #[must_use]
    pub fn to_viewbox(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lng, self.min_lat, self.max_lng, self.max_lat
        )
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub data_path: PathBuf,
    pub state_dir: PathBuf,
    pub geocode_cache_path: PathBuf,
    pub directory_url: String,
    pub geocoder_url: String,
    pub geocode_country: Option<String>,
    pub geocode_viewbox: Option<BoundingBox>,
    pub nearby_limit: usize,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub scraper_inter_request_delay_ms: u64,
    pub scraper_max_retries: u32,
    pub scraper_retry_backoff_base_secs: u64,
}
