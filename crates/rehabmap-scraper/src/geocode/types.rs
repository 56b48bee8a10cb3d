use rehabmap_core::{BoundingBox, Coordinate, GeoPoint, SearchPoint};
use serde::{Deserialize, Serialize};

/// One candidate from the Nominatim `/search` endpoint.
///
/// Nominatim returns coordinates as JSON strings.
#[derive(Debug, Deserialize)]
pub(crate) struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
}

/// Filters narrowing geocoder matches to the service area.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeocodeOptions {
    /// ISO 3166-1 alpha-2 code sent as `countrycodes`.
    pub country: Option<String>,
    /// Sent as `viewbox` with `bounded=1`.
    pub viewbox: Option<BoundingBox>,
}

/// A resolved address.
///
/// `latitude` and `longitude` keep the geocoder's literal text so rows written
/// from the same match group together exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeMatch {
    pub latitude: String,
    pub longitude: String,
    pub display_name: String,
}

impl GeocodeMatch {
    /// Numeric coordinates of the match.
    ///
    /// The client only builds matches whose text parses, so `None` means a
    /// hand-edited cache entry.
    #[must_use]
    pub fn point(&self) -> Option<GeoPoint> {
        let lat = Coordinate::parse(&self.latitude)?;
        let lng = Coordinate::parse(&self.longitude)?;
        Some(GeoPoint {
            lat: lat.value(),
            lng: lng.value(),
        })
    }

    /// The match as a map search point labelled with the geocoder's address.
    #[must_use]
    pub fn to_search_point(&self) -> Option<SearchPoint> {
        Some(SearchPoint {
            point: self.point()?,
            label: self.display_name.clone(),
        })
    }
}
