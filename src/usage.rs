use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// One client's consumption in its current window.
#[derive(Debug, Clone, Copy)]
pub struct UsageRecord {
    pub count: u32,
    /// Start of the window. Only ever set when the record is created.
    pub first_use: DateTime<Utc>,
}

/// In-memory map of client id -> usage record.
///
/// No persistence: the map is emptied on process restart, which is an
/// accepted tradeoff for a soft quota. Expired entries are dropped by
/// `sweep`, called on every quota check rather than from a background timer.
#[derive(Debug, Default)]
pub struct UsageStore {
    entries: DashMap<String, UsageRecord>,
}

impl UsageStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Drops every record whose window has fully elapsed.
    pub fn sweep(&self, now: DateTime<Utc>, window_ms: i64) {
        self.entries
            .retain(|_, record| (now - record.first_use).num_milliseconds() <= window_ms);
    }

    pub fn get(&self, client_id: &str) -> Option<UsageRecord> {
        self.entries.get(client_id).map(|record| *record)
    }

    pub fn remove(&self, client_id: &str) {
        self.entries.remove(client_id);
    }

    /// First use opens the window; later uses only bump the count.
    pub fn upsert(&self, client_id: &str, now: DateTime<Utc>) {
        self.entries
            .entry(client_id.to_string())
            .and_modify(|record| record.count += 1)
            .or_insert(UsageRecord {
                count: 1,
                first_use: now,
            });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
