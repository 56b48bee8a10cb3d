//! Provider records as stored in the dataset file, and their mappable form.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// One row of the provider dataset.
///
/// Coordinates are kept as the literal text of the file so that grouping can
/// compare them exactly as written. Rows produced by the scraper carry empty
/// coordinates when geocoding found no match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRecord {
    /// Grouping and visibility key. Not unique across branches.
    #[serde(rename = "Company Name")]
    pub company_name: String,
    #[serde(rename = "Display Name", default)]
    pub display_name: Option<String>,
    #[serde(rename = "Business Address")]
    pub business_address: String,
    #[serde(rename = "Suburb", default)]
    pub suburb: String,
    #[serde(rename = "State", default)]
    pub state: String,
    #[serde(rename = "Postcode", default)]
    pub postcode: String,
    #[serde(rename = "Region", default)]
    pub region: String,
    #[serde(rename = "Phone", default)]
    pub phone: String,
    /// Stable key used to target a single provider in the presentation layer.
    #[serde(rename = "Provider ID", default)]
    pub provider_id: String,
    #[serde(rename = "Link", default)]
    pub link: String,
    #[serde(rename = "Latitude", default)]
    pub latitude: String,
    #[serde(rename = "Longitude", default)]
    pub longitude: String,
}

impl ProviderRecord {
    /// Name shown on markers and list rows.
    #[must_use]
    pub fn display_label(&self) -> &str {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(self.company_name.as_str())
    }
}

/// A latitude or longitude holding both its literal text and numeric value.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    literal: String,
    value: f64,
}

impl Coordinate {
    /// Parses a decimal-degree field. Returns `None` for empty, non-numeric,
    /// or non-finite text.
    #[must_use]
    pub fn parse(literal: &str) -> Option<Self> {
        let value = literal.trim().parse::<f64>().ok()?;
        if !value.is_finite() {
            return None;
        }
        Some(Self {
            literal: literal.to_string(),
            value,
        })
    }

    #[must_use]
    pub fn literal(&self) -> &str {
        &self.literal
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }
}

/// A provider record whose coordinates parsed successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedProvider {
    pub record: ProviderRecord,
    pub latitude: Coordinate,
    pub longitude: Coordinate,
}

impl MappedProvider {
    /// Returns `None` when either coordinate is missing or non-numeric.
    #[must_use]
    pub fn from_record(record: ProviderRecord) -> Option<Self> {
        let latitude = Coordinate::parse(&record.latitude)?;
        let longitude = Coordinate::parse(&record.longitude)?;
        Some(Self {
            record,
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub fn point(&self) -> GeoPoint {
        GeoPoint {
            lat: self.latitude.value(),
            lng: self.longitude.value(),
        }
    }

    #[must_use]
    pub fn company_name(&self) -> &str {
        &self.record.company_name
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{MappedProvider, ProviderRecord};

    /// Builds a mapped provider with the given company and literal coordinates.
    pub(crate) fn provider(company: &str, lat: &str, lng: &str) -> MappedProvider {
        let record = ProviderRecord {
            company_name: company.to_string(),
            display_name: None,
            business_address: format!("1 {company} St, SYDNEY NSW 2000"),
            suburb: "Sydney".to_string(),
            state: "NSW".to_string(),
            postcode: "2000".to_string(),
            region: String::new(),
            phone: "N/A".to_string(),
            provider_id: company.to_lowercase().replace(' ', "-"),
            link: String::new(),
            latitude: lat.to_string(),
            longitude: lng.to_string(),
        };
        MappedProvider::from_record(record).expect("test coordinates must parse")
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::provider;
    use super::*;

    #[test]
    fn coordinate_keeps_literal_text() {
        let c = Coordinate::parse("-33.80").unwrap();
        assert_eq!(c.literal(), "-33.80");
        assert!((c.value() - (-33.8)).abs() < f64::EPSILON);
    }

    #[test]
    fn coordinate_rejects_non_numeric() {
        assert!(Coordinate::parse("").is_none());
        assert!(Coordinate::parse("   ").is_none());
        assert!(Coordinate::parse("N/A").is_none());
        assert!(Coordinate::parse("NaN").is_none());
        assert!(Coordinate::parse("inf").is_none());
    }

    #[test]
    fn record_without_coordinates_is_not_mapped() {
        let mut record = provider("Acme Rehab", "-33.8", "151.2").record;
        record.longitude = String::new();
        assert!(MappedProvider::from_record(record).is_none());
    }

    #[test]
    fn display_label_falls_back_to_company_name() {
        let mut p = provider("Acme Rehab", "-33.8", "151.2");
        assert_eq!(p.record.display_label(), "Acme Rehab");

        p.record.display_name = Some("  ".to_string());
        assert_eq!(p.record.display_label(), "Acme Rehab");

        p.record.display_name = Some("Acme Rehab Parramatta".to_string());
        assert_eq!(p.record.display_label(), "Acme Rehab Parramatta");
    }
}
