//! Composes what the map shows from the dataset and the session.

use crate::geo::rank_by_distance;
use crate::grouping::{group_by_location, LocationGroup};
use crate::providers::MappedProvider;
use crate::session::{SearchPoint, SessionState};
use crate::visibility::Visibility;

/// One map marker.
#[derive(Debug, Clone)]
pub struct Marker<'a> {
    pub group: LocationGroup<'a>,
    /// At least one company at this location is highlighted.
    pub highlighted: bool,
}

/// One row of the nearest-providers list.
#[derive(Debug, Clone, Copy)]
pub struct NearbyRow<'a> {
    pub provider: &'a MappedProvider,
    pub distance_km: f64,
    pub visibility: Visibility,
}

#[derive(Debug, Clone)]
pub struct MapView<'a> {
    pub markers: Vec<Marker<'a>>,
    pub search_point: Option<&'a SearchPoint>,
    /// Nearest providers to the search point, truncated for display. Empty
    /// when there is no search point.
    pub nearby: Vec<NearbyRow<'a>>,
    /// Providers left off the map because their company is hidden.
    pub hidden: usize,
}

/// Builds the map view.
///
/// Hidden companies are removed before grouping, so they never produce a
/// marker. Ranking runs over the full provider list; hidden rows stay in the
/// nearby list flagged as hidden.
#[must_use]
pub fn build_map_view<'a>(
    providers: &'a [MappedProvider],
    session: &'a SessionState,
    nearby_limit: usize,
) -> MapView<'a> {
    let visibility = &session.visibility;

    let shown: Vec<&MappedProvider> = providers
        .iter()
        .filter(|p| !visibility.is_hidden(p.company_name()))
        .collect();
    let hidden = providers.len() - shown.len();

    let markers = group_by_location(shown)
        .into_iter()
        .map(|group| {
            let highlighted = group
                .members
                .iter()
                .any(|p| visibility.is_highlighted(p.company_name()));
            Marker { group, highlighted }
        })
        .collect();

    let nearby = session
        .search_point
        .as_ref()
        .map(|search| {
            rank_by_distance(search.point, providers)
                .into_iter()
                .take(nearby_limit)
                .map(|ranked| NearbyRow {
                    provider: ranked.provider,
                    distance_km: ranked.distance_km,
                    visibility: visibility.get(ranked.provider.company_name()),
                })
                .collect()
        })
        .unwrap_or_default();

    MapView {
        markers,
        search_point: session.search_point.as_ref(),
        nearby,
        hidden,
    }
}
