//! Ledger client trait definition.

use crate::protocol::LedgerRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reaching the ledger
///
/// A non-2xx answer is not an error at this layer; it comes back as a
/// [`LedgerResponse`] so its status and body can be shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Invalid ledger client configuration: {0}")]
    Client(String),
}

/// Status code and text body returned by the ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerResponse {
    pub status: u16,
    pub body: String,
}

impl LedgerResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Any status in `[200, 300)` counts as accepted
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Delivery of records to the append-only ledger
///
/// Implementations can be:
/// - HttpLedgerClient for the deployed ledger script
/// - MockLedger for testing
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Send one record and return whatever the ledger answered
    async fn deliver(&self, record: &LedgerRecord) -> Result<LedgerResponse, LedgerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert!(LedgerResponse::new(200, "ok").is_success());
        assert!(LedgerResponse::new(299, "").is_success());
        assert!(!LedgerResponse::new(199, "").is_success());
        assert!(!LedgerResponse::new(300, "").is_success());
        assert!(!LedgerResponse::new(409, "duplicate").is_success());
    }

    #[test]
    fn test_transport_error_text() {
        let err = LedgerError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }
}
