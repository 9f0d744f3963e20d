//! Day-bucketed study journal.

use crate::identity::Handle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Seconds in a journal day.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Index of the day containing `timestamp` (days since the unix epoch).
pub fn day_index(timestamp: u64) -> u64 {
    timestamp / SECONDS_PER_DAY
}

/// Start-of-day timestamp for `timestamp`.
pub fn day_bucket(timestamp: u64) -> u64 {
    day_index(timestamp) * SECONDS_PER_DAY
}

/// Encrypted metrics stored for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyEntry {
    /// Encrypted study time.
    pub study_time: Handle,
    /// Encrypted focus level.
    pub focus_level: Handle,
}

/// Read view of a journal day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StudyData {
    /// Encrypted study time, zero when absent.
    pub study_time: Handle,
    /// Encrypted focus level, zero when absent.
    pub focus_level: Handle,
    /// Whether an entry exists for the day.
    pub exists: bool,
}

/// One student's journal. `days` keeps first-write order and never repeats.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudyJournal {
    days: Vec<u64>,
    entries: BTreeMap<u64, StudyEntry>,
}

impl StudyJournal {
    /// Writes `entry` into the bucket of `timestamp`, returning the bucket.
    pub fn upsert(&mut self, timestamp: u64, entry: StudyEntry) -> u64 {
        let bucket = day_bucket(timestamp);
        if self.entries.insert(bucket, entry).is_none() {
            self.days.push(bucket);
        }
        bucket
    }

    /// Entry for the bucket of `timestamp`.
    pub fn data(&self, timestamp: u64) -> StudyData {
        self.entries
            .get(&day_bucket(timestamp))
            .map(|entry| StudyData {
                study_time: entry.study_time,
                focus_level: entry.focus_level,
                exists: true,
            })
            .unwrap_or_default()
    }

    /// Buckets in first-write order.
    pub fn days(&self) -> &[u64] {
        &self.days
    }
}
