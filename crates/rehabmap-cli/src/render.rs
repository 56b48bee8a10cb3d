//! Terminal and GeoJSON output for map views.

use rehabmap_core::{MapView, Marker, Visibility};
use serde_json::{json, Value};

const NAME_WIDTH: usize = 48;

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        format!("{}...", s.chars().take(width - 3).collect::<String>())
    } else {
        s.to_string()
    }
}

/// Marker label: the single provider's name, or every name at the location.
fn marker_title(marker: &Marker<'_>) -> String {
    marker
        .group
        .members
        .iter()
        .map(|p| p.record.display_label())
        .collect::<Vec<_>>()
        .join(" / ")
}

pub(crate) fn print_markers(view: &MapView<'_>) {
    if view.markers.is_empty() {
        println!("no markers to show");
        return;
    }

    println!("{:<12}{:<13}{:<7}{:<5}PROVIDERS", "LAT", "LNG", "COUNT", "");
    for marker in &view.markers {
        let flag = if marker.highlighted { "*" } else { "" };
        println!(
            "{:<12}{:<13}{:<7}{:<5}{}",
            marker.group.key.latitude,
            marker.group.key.longitude,
            marker.group.len(),
            flag,
            truncate(&marker_title(marker), NAME_WIDTH * 2)
        );
    }

    println!();
    println!(
        "{} markers, {} hidden providers (* = highlighted)",
        view.markers.len(),
        view.hidden
    );
}

pub(crate) fn print_nearby(view: &MapView<'_>) {
    if view.nearby.is_empty() {
        println!("no providers to rank");
        return;
    }

    println!(
        "{:<4}{:<10}{:<50}{:<20}{:<16}STATE",
        "#", "KM", "PROVIDER", "SUBURB", "PHONE"
    );
    for (i, row) in view.nearby.iter().enumerate() {
        let record = &row.provider.record;
        println!(
            "{:<4}{:<10.2}{:<50}{:<20}{:<16}{}",
            i + 1,
            row.distance_km,
            truncate(record.display_label(), NAME_WIDTH),
            truncate(&record.suburb, 18),
            record.phone,
            row.visibility
        );
    }
}

/// GeoJSON `FeatureCollection` of the markers, plus the search point if any.
///
/// Coordinates are emitted in GeoJSON `[lng, lat]` order.
pub(crate) fn markers_geojson(view: &MapView<'_>) -> Value {
    let mut features: Vec<Value> = view
        .markers
        .iter()
        .map(|marker| {
            let anchor = marker.group.anchor();
            let providers: Vec<Value> = marker
                .group
                .members
                .iter()
                .map(|p| {
                    json!({
                        "company": p.company_name(),
                        "name": p.record.display_label(),
                        "address": p.record.business_address,
                        "phone": p.record.phone,
                        "provider_id": p.record.provider_id,
                        "link": p.record.link,
                    })
                })
                .collect();
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [anchor.longitude.value(), anchor.latitude.value()],
                },
                "properties": {
                    "kind": "providers",
                    "title": marker_title(marker),
                    "count": marker.group.len(),
                    "highlighted": marker.highlighted,
                    "providers": providers,
                },
            })
        })
        .collect();

    if let Some(search) = view.search_point {
        let nearby: Vec<Value> = view
            .nearby
            .iter()
            .map(|row| {
                json!({
                    "company": row.provider.company_name(),
                    "name": row.provider.record.display_label(),
                    "distance_km": row.distance_km,
                    "hidden": row.visibility == Visibility::Hidden,
                    "highlighted": row.visibility == Visibility::Highlighted,
                })
            })
            .collect();
        features.push(json!({
            "type": "Feature",
            "geometry": {
                "type": "Point",
                "coordinates": [search.point.lng, search.point.lat],
            },
            "properties": {
                "kind": "search",
                "title": search.label,
                "nearby": nearby,
            },
        }));
    }

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

pub(crate) fn print_geojson(view: &MapView<'_>) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&markers_geojson(view))?);
    Ok(())
}
