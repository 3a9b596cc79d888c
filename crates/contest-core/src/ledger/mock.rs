//! Mock ledger client for testing.

use super::store::{Ledger, LedgerPolicy};
use super::traits::{LedgerClient, LedgerError, LedgerResponse};
use crate::protocol::LedgerRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

/// In-memory ledger behind the [`LedgerClient`] trait
///
/// Answers the way the ledger service does: 200 with a text body on
/// success, the rejection's status and message otherwise. Can be taken
/// offline to simulate transport failures.
#[derive(Clone)]
pub struct MockLedger {
    ledger: Arc<Mutex<Ledger>>,
    /// Every record that reached the ledger, accepted or not
    delivered: Arc<Mutex<Vec<LedgerRecord>>>,
    /// Simulated current time
    current_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    offline: Arc<Mutex<bool>>,
}

impl MockLedger {
    pub fn new(policy: LedgerPolicy) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(Ledger::new(policy))),
            delivered: Arc::new(Mutex::new(Vec::new())),
            current_time: Arc::new(Mutex::new(None)),
            offline: Arc::new(Mutex::new(false)),
        }
    }

    /// Get current time (real or simulated)
    pub fn now(&self) -> DateTime<Utc> {
        self.current_time.lock().unwrap().unwrap_or_else(Utc::now)
    }

    /// Pin the ledger clock
    pub fn set_time(&self, at: DateTime<Utc>) {
        *self.current_time.lock().unwrap() = Some(at);
    }

    /// Make every delivery fail with a transport error
    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock().unwrap() = offline;
    }

    /// Records that reached the ledger (for testing)
    pub fn delivered(&self) -> Vec<LedgerRecord> {
        self.delivered.lock().unwrap().clone()
    }

    /// Run a closure against the underlying ledger
    pub fn with_ledger<R>(&self, f: impl FnOnce(&Ledger) -> R) -> R {
        f(&self.ledger.lock().unwrap())
    }
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new(LedgerPolicy::default())
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn deliver(&self, record: &LedgerRecord) -> Result<LedgerResponse, LedgerError> {
        if *self.offline.lock().unwrap() {
            return Err(LedgerError::Transport(
                "connection refused (mock ledger offline)".to_string(),
            ));
        }

        self.delivered.lock().unwrap().push(record.clone());

        let now = self.now();
        let result = self.ledger.lock().unwrap().append(record, now);
        Ok(match result {
            Ok(appended) => LedgerResponse::new(200, appended.to_string()),
            Err(rejection) => LedgerResponse::new(rejection.status_code(), rejection.to_string()),
        })
    }
}
