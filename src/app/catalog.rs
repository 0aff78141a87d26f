//! Run-scoped collection of discovered releases
//!
//! The catalog behaves like a set keyed by display name: the first record
//! announcing a release wins and later duplicates (from the same or another
//! mirror) are dropped. Insertion order is kept so that sorting by sort key
//! is stable.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::app::release::ReleaseRecord;

/// De-duplicated set of releases merged across mirrors
#[derive(Debug, Clone, Default)]
pub struct ReleaseCatalog {
    records: Vec<ReleaseRecord>,
    seen: HashSet<String>,
}

impl ReleaseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, returning `false` if an equal record is already present
    pub fn insert(&mut self, record: ReleaseRecord) -> bool {
        if !self.seen.insert(record.display_name().to_string()) {
            debug!("Skipping duplicate release: {}", record);
            return false;
        }
        self.records.push(record);
        true
    }

    /// Merge another catalog into this one
    pub fn merge(&mut self, other: ReleaseCatalog) -> usize {
        other
            .records
            .into_iter()
            .map(|record| self.insert(record))
            .filter(|added| *added)
            .count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, record: &ReleaseRecord) -> bool {
        self.seen.contains(record.display_name())
    }

    /// Records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &ReleaseRecord> {
        self.records.iter()
    }

    /// Records ordered by ascending sort key
    ///
    /// The sort is stable: records with equal keys keep insertion order.
    pub fn sorted(&self) -> Vec<&ReleaseRecord> {
        let mut sorted: Vec<&ReleaseRecord> = self.records.iter().collect();
        sorted.sort_by(|a, b| a.sortkey().cmp(b.sortkey()));
        sorted
    }

    /// Number of releases relevant on `today`
    pub fn relevant_count_on(&self, today: NaiveDate) -> usize {
        self.records
            .iter()
            .filter(|record| record.is_relevant_on(today))
            .count()
    }
}

impl Extend<ReleaseRecord> for ReleaseCatalog {
    fn extend<T: IntoIterator<Item = ReleaseRecord>>(&mut self, iter: T) {
        for record in iter {
            self.insert(record);
        }
    }
}

impl FromIterator<ReleaseRecord> for ReleaseCatalog {
    fn from_iter<T: IntoIterator<Item = ReleaseRecord>>(iter: T) -> Self {
        let mut catalog = Self::new();
        catalog.extend(iter);
        catalog
    }
}

impl IntoIterator for ReleaseCatalog {
    type Item = ReleaseRecord;
    type IntoIter = std::vec::IntoIter<ReleaseRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
