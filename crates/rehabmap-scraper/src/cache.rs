//! On-disk memo of geocoder answers, keyed by normalized address.
//!
//! Confirmed misses are cached too so a rerun does not spend a request on an
//! address the geocoder already could not place.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScraperError;
use crate::geocode::GeocodeMatch;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedGeocode {
    /// `None` records a confirmed miss.
    pub result: Option<GeocodeMatch>,
    pub cached_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeocodeCache {
    entries: BTreeMap<String, CachedGeocode>,
}

impl GeocodeCache {
    /// Loads the cache at `path`.
    ///
    /// A missing file is an empty cache. A file that cannot be read or parsed
    /// is logged and also treated as empty; it is overwritten on the next save.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "unreadable geocode cache; starting empty"
                );
                return Self::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(cache) => cache,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "corrupt geocode cache; starting empty"
                );
                Self::default()
            }
        }
    }

    /// Writes the cache to `path` through a sibling temp file.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::CacheIo`] if the directory cannot be created or
    /// the file cannot be written or renamed into place.
    pub fn save(&self, path: &Path) -> Result<(), ScraperError> {
        let io_err = |source| ScraperError::CacheIo {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| ScraperError::CacheIo {
            path: path.display().to_string(),
            source: std::io::Error::other(e),
        })?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(io_err)?;
        std::fs::rename(&tmp, path).map_err(io_err)?;

        tracing::debug!(
            path = %path.display(),
            entries = self.entries.len(),
            "saved geocode cache"
        );
        Ok(())
    }

    /// Cached outcome for `address`, if any.
    #[must_use]
    pub fn get(&self, address: &str) -> Option<&CachedGeocode> {
        self.entries.get(&normalize_address(address))
    }

    pub fn insert(&mut self, address: &str, result: Option<GeocodeMatch>) {
        self.entries.insert(
            normalize_address(address),
            CachedGeocode {
                result,
                cached_at: Utc::now(),
            },
        );
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Trimmed, whitespace-collapsed, lowercased address.
#[must_use]
pub fn normalize_address(address: &str) -> String {
    address
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
