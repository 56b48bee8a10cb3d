//! Per-company visibility: normal, highlighted (favorite), or hidden.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Normal,
    Highlighted,
    Hidden,
}

impl Visibility {
    /// The single forward step of the cycle `normal -> highlighted -> hidden -> normal`.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Visibility::Normal => Visibility::Highlighted,
            Visibility::Highlighted => Visibility::Hidden,
            Visibility::Hidden => Visibility::Normal,
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Normal => write!(f, "normal"),
            Visibility::Highlighted => write!(f, "highlighted"),
            Visibility::Hidden => write!(f, "hidden"),
        }
    }
}

/// Visibility keyed by company name. Companies without an entry are `Normal`.
///
/// State is per company, not per location: every branch of a company shares it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisibilityMap {
    entries: BTreeMap<String, Visibility>,
}

impl VisibilityMap {
    #[must_use]
    pub fn get(&self, company: &str) -> Visibility {
        self.entries.get(company).copied().unwrap_or_default()
    }

    /// Advances `company` one step and returns its new state.
    pub fn cycle(&mut self, company: &str) -> Visibility {
        let next = self.get(company).next();
        self.entries.insert(company.to_string(), next);
        next
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn is_hidden(&self, company: &str) -> bool {
        self.get(company) == Visibility::Hidden
    }

    #[must_use]
    pub fn is_highlighted(&self, company: &str) -> bool {
        self.get(company) == Visibility::Highlighted
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Companies whose state is not `Normal`, in name order.
    pub fn marked(&self) -> impl Iterator<Item = (&str, Visibility)> {
        self.entries
            .iter()
            .filter(|(_, v)| **v != Visibility::Normal)
            .map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_company_is_normal() {
        let map = VisibilityMap::default();
        assert_eq!(map.get("Acme Rehab"), Visibility::Normal);
    }

    #[test]
    fn first_cycle_highlights() {
        let mut map = VisibilityMap::default();
        assert_eq!(map.cycle("Acme Rehab"), Visibility::Highlighted);
        assert!(map.is_highlighted("Acme Rehab"));
    }

    #[test]
    fn three_cycles_return_to_normal() {
        let mut map = VisibilityMap::default();
        assert_eq!(map.cycle("Acme Rehab"), Visibility::Highlighted);
        assert_eq!(map.cycle("Acme Rehab"), Visibility::Hidden);
        assert!(map.is_hidden("Acme Rehab"));
        assert_eq!(map.cycle("Acme Rehab"), Visibility::Normal);
        assert_eq!(map.get("Acme Rehab"), Visibility::Normal);
    }

    #[test]
    fn cycling_one_company_leaves_others_alone() {
        let mut map = VisibilityMap::default();
        map.cycle("Harbour Physio");
        map.cycle("Acme Rehab");
        map.cycle("Acme Rehab");
        assert_eq!(map.get("Harbour Physio"), Visibility::Highlighted);
        assert_eq!(map.get("Acme Rehab"), Visibility::Hidden);
        assert_eq!(map.get("West Rehab"), Visibility::Normal);
    }

    #[test]
    fn reset_clears_every_company() {
        let mut map = VisibilityMap::default();
        map.cycle("A");
        map.cycle("B");
        map.cycle("B");
        map.reset();
        assert!(map.is_empty());
        assert_eq!(map.get("A"), Visibility::Normal);
        assert_eq!(map.get("B"), Visibility::Normal);
    }

    #[test]
    fn serializes_as_plain_object() {
        let mut map = VisibilityMap::default();
        map.cycle("Acme Rehab");
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"Acme Rehab":"highlighted"}"#);

        let back: VisibilityMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn marked_skips_normal_entries() {
        let mut map = VisibilityMap::default();
        map.cycle("A");
        map.cycle("B");
        map.cycle("B");
        map.cycle("B");
        let marked: Vec<_> = map.marked().collect();
        assert_eq!(marked, vec![("A", Visibility::Highlighted)]);
    }
}
