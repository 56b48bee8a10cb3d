//! Partitions providers into co-located groups, one map marker per group.
//!
//! Two providers share a group only when their latitude and longitude text is
//! identical. `-33.8` and `-33.80` are different locations here; coordinates
//! are not normalized before keying.

use std::collections::HashMap;

use crate::providers::MappedProvider;

/// Exact-match key over the literal coordinate text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationKey {
    pub latitude: String,
    pub longitude: String,
}

impl LocationKey {
    #[must_use]
    pub fn of(provider: &MappedProvider) -> Self {
        Self {
            latitude: provider.latitude.literal().to_string(),
            longitude: provider.longitude.literal().to_string(),
        }
    }
}

/// A non-empty run of providers sharing one location, in input order.
#[derive(Debug, Clone)]
pub struct LocationGroup<'a> {
    pub key: LocationKey,
    pub members: Vec<&'a MappedProvider>,
}

impl LocationGroup<'_> {
    /// The first member; groups are never empty.
    #[must_use]
    pub fn anchor(&self) -> &MappedProvider {
        self.members[0]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Groups providers by exact coordinate match.
///
/// Group order follows the first occurrence of each location in the input;
/// members keep input order. Every input provider lands in exactly one group.
pub fn group_by_location<'a, I>(providers: I) -> Vec<LocationGroup<'a>>
where
    I: IntoIterator<Item = &'a MappedProvider>,
{
    let mut index: HashMap<LocationKey, usize> = HashMap::new();
    let mut groups: Vec<LocationGroup<'a>> = Vec::new();

    for provider in providers {
        let key = LocationKey::of(provider);
        if let Some(&slot) = index.get(&key) {
            groups[slot].members.push(provider);
        } else {
            index.insert(key.clone(), groups.len());
            groups.push(LocationGroup {
                key,
                members: vec![provider],
            });
        }
    }

    groups
}
