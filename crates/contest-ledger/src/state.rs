//! Application state management.

use beauty_contest_core::ledger::{Appended, CommitEntry, ContestResults, RevealEntry};
use beauty_contest_core::{Ledger, LedgerPolicy, LedgerRecord, LedgerRejection};
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Mutex<AppStateInner>>,
}

struct AppStateInner {
    ledger: Ledger,
    /// Simulated current time (for deadline testing)
    current_time: Option<DateTime<Utc>>,
}

impl AppState {
    pub fn new(policy: LedgerPolicy) -> Self {
        Self {
            inner: Arc::new(Mutex::new(AppStateInner {
                ledger: Ledger::new(policy),
                current_time: None,
            })),
        }
    }

    /// Get current time (real or simulated)
    pub fn now(&self) -> DateTime<Utc> {
        self.inner
            .lock()
            .unwrap()
            .current_time
            .unwrap_or_else(Utc::now)
    }

    /// Pin the clock to an instant
    pub fn set_time(&self, at: DateTime<Utc>) {
        self.inner.lock().unwrap().current_time = Some(at);
    }

    /// Advance simulated time by seconds
    pub fn advance_time(&self, seconds: i64) {
        let mut inner = self.inner.lock().unwrap();
        let current = inner.current_time.unwrap_or_else(Utc::now);
        inner.current_time = Some(current + Duration::seconds(seconds));
    }

    /// Append a record at the current time
    pub fn append(&self, record: &LedgerRecord) -> Result<Appended, LedgerRejection> {
        let mut inner = self.inner.lock().unwrap();
        let now = inner.current_time.unwrap_or_else(Utc::now);
        inner.ledger.append(record, now)
    }

    pub fn commits(&self) -> Vec<CommitEntry> {
        self.inner.lock().unwrap().ledger.commits().to_vec()
    }

    pub fn reveals(&self) -> Vec<RevealEntry> {
        self.inner.lock().unwrap().ledger.reveals().to_vec()
    }

    pub fn results(&self) -> ContestResults {
        self.inner.lock().unwrap().ledger.results()
    }
}
