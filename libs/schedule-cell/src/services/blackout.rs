// libs/schedule-cell/src/services/blackout.rs
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

use crate::models::{BlackoutRule, BlackoutScope, BlockedDay};

#[derive(Debug, Clone)]
pub struct DayBlock {
    pub scope: BlackoutScope,
    pub reason: Option<String>,
}

/// Per-day blocked lookup for a date window, expanded from global and
/// practitioner blackout rules.
///
/// Practitioner rules are indexed before global ones, so where both cover a
/// date the practitioner reason wins the first-non-null-reason tie-break.
/// A date's reason, once set, is never overwritten by a later match.
#[derive(Debug, Default)]
pub struct BlackoutIndex {
    days: HashMap<NaiveDate, DayBlock>,
}

impl BlackoutIndex {
    pub fn build(window_start: NaiveDate, window_end: NaiveDate, rules: &[BlackoutRule]) -> Self {
        let mut index = Self { days: HashMap::new() };
        if window_end < window_start {
            return index;
        }

        let practitioner = rules.iter().filter(|r| r.scope == BlackoutScope::Practitioner);
        let global = rules.iter().filter(|r| r.scope == BlackoutScope::Global);

        for rule in practitioner.chain(global) {
            index.apply_rule(window_start, window_end, rule);
        }

        index
    }

    fn apply_rule(&mut self, window_start: NaiveDate, window_end: NaiveDate, rule: &BlackoutRule) {
        // Non-recurring rules cover a literal range; clamp it to the window.
        // Annual rules must be checked day by day for month-day wraparound.
        let (from, to) = if rule.annual_recurrence {
            (window_start, window_end)
        } else {
            (window_start.max(rule.start_date), window_end.min(rule.end_date))
        };

        let mut day = from;
        while day <= to {
            if rule.covers(day) {
                let entry = self.days.entry(day).or_insert_with(|| DayBlock {
                    scope: rule.scope,
                    reason: None,
                });
                if entry.reason.is_none() {
                    entry.reason = rule.reason.clone();
                }
            }
            day += Duration::days(1);
        }
    }

    pub fn is_blocked(&self, date: NaiveDate) -> Option<&DayBlock> {
        self.days.get(&date)
    }

    pub fn blocked_days(&self) -> Vec<BlockedDay> {
        let mut days: Vec<BlockedDay> = self
            .days
            .iter()
            .map(|(date, block)| BlockedDay {
                date: *date,
                scope: block.scope,
                reason: block.reason.clone(),
            })
            .collect();
        days.sort_by_key(|d| d.date);
        days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
