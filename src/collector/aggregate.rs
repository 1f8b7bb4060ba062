//! Reduction of event records into per-key totals.

use std::collections::HashMap;

use crate::event::EventRecord;

/// Composite key events are grouped by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AggregationKey {
    pub reason: String,
    pub type_: String,
    pub involved_object_kind: String,
}

impl From<&EventRecord> for AggregationKey {
    fn from(record: &EventRecord) -> Self {
        Self {
            reason: record.reason.clone(),
            type_: record.type_.clone(),
            involved_object_kind: record.involved_object_kind.clone(),
        }
    }
}

/// Running totals for one collection.
///
/// Totals saturate at `u64::MAX` instead of wrapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationTable {
    totals: HashMap<AggregationKey, u64>,
}

impl AggregationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a full set of records.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a EventRecord>) -> Self {
        let mut table = Self::new();
        for record in records {
            table.add(record);
        }
        table
    }

    /// Add a record's count to its key. A zero count still creates the key.
    pub fn add(&mut self, record: &EventRecord) {
        let total = self.totals.entry(AggregationKey::from(record)).or_insert(0);
        *total = total.saturating_add(record.count);
    }

    pub fn get(&self, key: &AggregationKey) -> Option<u64> {
        self.totals.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

impl IntoIterator for AggregationTable {
    type Item = (AggregationKey, u64);
    type IntoIter = std::collections::hash_map::IntoIter<AggregationKey, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.totals.into_iter()
    }
}
