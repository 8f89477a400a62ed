// libs/calendar-cell/src/services/cache.rs
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use crate::models::{DayBadge, MonthKey};

/// Explicit cache for aggregated month badges.
///
/// Entries are never invalidated automatically; a booking mutation must evict
/// the affected month through `evict_month`, which drops every filter variant
/// of that month's key.
#[derive(Debug, Default)]
pub struct MonthBadgeCache {
    entries: Mutex<HashMap<MonthKey, BTreeMap<NaiveDate, DayBadge>>>,
}

impl MonthBadgeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &MonthKey) -> Option<BTreeMap<NaiveDate, DayBadge>> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    pub fn insert(&self, key: MonthKey, badges: BTreeMap<NaiveDate, DayBadge>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key, badges);
        }
    }

    /// Drop all cached variants of one calendar month.
    pub fn evict_month(&self, year: i32, month: u32) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.retain(|key, _| key.year != year || key.month != month);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
