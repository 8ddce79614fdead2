//! Travel data cache for the loaded selection.

use std::collections::HashMap;

use crate::models::{Period, TravelAllowanceDetail};

/// Travel details keyed by `(employee_id, period)`.
///
/// Entries are only ever replaced whole, one employee at a time, so
/// concurrent resolutions for different employees never overwrite each
/// other's results.
#[derive(Debug, Clone, Default)]
pub struct TravelCache {
    entries: HashMap<(i64, Period), TravelAllowanceDetail>,
}

impl TravelCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached detail for one employee and month.
    pub fn get(&self, employee_id: i64, period: Period) -> Option<&TravelAllowanceDetail> {
        self.entries.get(&(employee_id, period))
    }

    /// Inserts or replaces the detail for one employee and month.
    pub fn upsert(&mut self, employee_id: i64, period: Period, detail: TravelAllowanceDetail) {
        self.entries.insert((employee_id, period), detail);
    }

    /// Drops one employee's entry for a month.
    pub fn remove(&mut self, employee_id: i64, period: Period) -> Option<TravelAllowanceDetail> {
        self.entries.remove(&(employee_id, period))
    }

    /// Drops every entry that does not belong to `period`.
    pub fn retain_period(&mut self, period: Period) {
        self.entries.retain(|(_, p), _| *p == period);
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
