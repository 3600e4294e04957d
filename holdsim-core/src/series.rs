//! SparseSeries — ordered date→value map with nearest-neighbor lookup.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered mapping from calendar date to a value.
///
/// At most one entry per date; `set` overwrites (last write wins). The two
/// nearest-neighbor lookups implement forward-fill (`latest_at_or_before`)
/// and its mirror (`earliest_at_or_after`). Every lookup on an empty series
/// returns `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseSeries<V> {
    entries: BTreeMap<NaiveDate, V>,
}

impl<V> SparseSeries<V> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert or overwrite the value at `date`.
    pub fn set(&mut self, date: NaiveDate, value: V) {
        self.entries.insert(date, value);
    }

    /// Value at exactly `date`, if present.
    pub fn get(&self, date: NaiveDate) -> Option<&V> {
        self.entries.get(&date)
    }

    /// Value at `date` if present, else at the greatest key strictly before
    /// `date`, else `None` (date precedes the series).
    pub fn latest_at_or_before(&self, date: NaiveDate) -> Option<&V> {
        self.entries.range(..=date).next_back().map(|(_, v)| v)
    }

    /// Like [`latest_at_or_before`](Self::latest_at_or_before) but also
    /// reports the key the lookup resolved to.
    pub fn latest_entry_at_or_before(&self, date: NaiveDate) -> Option<(NaiveDate, &V)> {
        self.entries.range(..=date).next_back().map(|(d, v)| (*d, v))
    }

    /// Value at `date` if present, else at the smallest key strictly after
    /// `date`, else `None` (date follows the series).
    pub fn earliest_at_or_after(&self, date: NaiveDate) -> Option<&V> {
        self.entries.range(date..).next().map(|(_, v)| v)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.entries.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.entries.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &V)> + '_ {
        self.entries.iter().map(|(d, v)| (*d, v))
    }

    /// Keys in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.entries.keys().copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<V> Default for SparseSeries<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<(NaiveDate, V)> for SparseSeries<V> {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
