//! Partitions heroes by their primary occupation.

use indexmap::IndexMap;

use crate::model::{HeroRecord, PLACEHOLDER_UNKNOWN};

/// Heroes grouped by primary occupation, in order of first appearance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupedRecords {
    groups: IndexMap<String, Vec<HeroRecord>>,
}

impl GroupedRecords {
    /// Groups `heroes` by their first occupation tag.
    ///
    /// Group order follows the first occurrence of each key and members keep their input order.
    pub fn from_records<I>(heroes: I) -> Self
    where
        I: IntoIterator<Item = HeroRecord>,
    {
        let mut groups: IndexMap<String, Vec<HeroRecord>> = IndexMap::new();
        for hero in heroes {
            groups
                .entry(hero.primary_occupation().to_string())
                .or_default()
                .push(hero);
        }
        Self { groups }
    }

    /// Iterates over `(occupation, members)` pairs in group order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[HeroRecord])> {
        self.groups
            .iter()
            .map(|(key, members)| (key.as_str(), members.as_slice()))
    }

    /// Returns the members of the group keyed by `occupation`.
    pub fn get(&self, occupation: &str) -> Option<&[HeroRecord]> {
        self.groups.get(occupation).map(Vec::as_slice)
    }

    /// Returns the group keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns whether there are no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of heroes across all groups.
    pub fn hero_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Returns whether a group gets its own heading and trailing separator.
pub fn is_shared_occupation(key: &str, members: &[HeroRecord]) -> bool {
    members.len() > 1 && key != PLACEHOLDER_UNKNOWN
}
