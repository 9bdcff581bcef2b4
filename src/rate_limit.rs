use chrono::{DateTime, Utc};

use crate::usage::UsageStore;

/// Max successful upstream calls per client per window.
pub const MAX_FREE_USES: u32 = 10;
/// Rolling window length: 24 hours.
pub const WINDOW_MS: i64 = 86_400_000;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Outcome of a quota check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuotaDecision {
    pub allowed: bool,
    pub remaining: u32,
    /// Hours until the client's window resets, to one decimal place.
    /// `None` for clients with no usage in the current window.
    pub reset_hours: Option<f64>,
}

/// Per-client daily quota over a rolling window.
///
/// The window slides from each client's first recorded use rather than being
/// calendar-aligned, so clients never reset in a synchronized stampede. The
/// current time is passed in by the caller, which keeps the decision logic
/// deterministic under test.
#[derive(Debug)]
pub struct RateLimiter {
    store: UsageStore,
    max_uses: u32,
    window_ms: i64,
}

impl RateLimiter {
    pub fn new(max_uses: u32, window_ms: i64) -> Self {
        Self {
            store: UsageStore::new(),
            max_uses,
            window_ms,
        }
    }

    /// Answers "is this request allowed" and "how much quota remains".
    ///
    /// Sweeps the store first, so memory stays bounded by the set of clients
    /// active within one window.
    pub fn check_quota(&self, client_id: &str, now: DateTime<Utc>) -> QuotaDecision {
        self.store.sweep(now, self.window_ms);

        let Some(record) = self.store.get(client_id) else {
            return self.fresh();
        };

        let elapsed_ms = (now - record.first_use).num_milliseconds();
        if elapsed_ms > self.window_ms {
            self.store.remove(client_id);
            return self.fresh();
        }

        let remaining = self.max_uses.saturating_sub(record.count);
        QuotaDecision {
            allowed: remaining > 0,
            remaining,
            reset_hours: Some(round_tenth(
                (self.window_ms - elapsed_ms) as f64 / MS_PER_HOUR,
            )),
        }
    }

    /// Charges one use against the client's quota.
    ///
    /// Callers must only invoke this after a successful upstream call: quota
    /// is consumed on success, not on attempt.
    pub fn record_use(&self, client_id: &str, now: DateTime<Utc>) {
        self.store.sweep(now, self.window_ms);
        self.store.upsert(client_id, now);
    }

    /// Number of clients with usage in the current window.
    pub fn tracked_clients(&self) -> usize {
        self.store.len()
    }

    fn fresh(&self) -> QuotaDecision {
        QuotaDecision {
            allowed: true,
            remaining: self.max_uses,
            reset_hours: None,
        }
    }
}

fn round_tenth(hours: f64) -> f64 {
    (hours * 10.0).round() / 10.0
}
