//! Great-circle distance and nearest-first ranking.

use serde::{Deserialize, Serialize};

use crate::providers::MappedProvider;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Haversine distance between two decimal-degree points, in kilometres.
#[must_use]
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let dlat = (to.lat - from.lat).to_radians();
    let dlng = (to.lng - from.lng).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (dlng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// A provider paired with its distance from the search point.
#[derive(Debug, Clone, Copy)]
pub struct RankedProvider<'a> {
    pub provider: &'a MappedProvider,
    pub distance_km: f64,
}

/// Ranks every provider by distance from `reference`, nearest first.
///
/// The sort is stable, so equidistant providers keep their input order.
/// Truncating to a display count is left to the caller.
#[must_use]
pub fn rank_by_distance(
    reference: GeoPoint,
    providers: &[MappedProvider],
) -> Vec<RankedProvider<'_>> {
    let mut ranked: Vec<RankedProvider<'_>> = providers
        .iter()
        .map(|provider| RankedProvider {
            provider,
            distance_km: haversine_km(reference, provider.point()),
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}
