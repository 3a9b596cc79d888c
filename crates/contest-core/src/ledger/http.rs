//! HTTP client for the ledger service.
//!
//! Posts each record as a JSON body to a single endpoint URL and hands back
//! the raw status and text.

use crate::ledger::traits::{LedgerClient, LedgerError, LedgerResponse};
use crate::protocol::LedgerRecord;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// HTTP client for the ledger
pub struct HttpLedgerClient {
    /// HTTP client
    client: Client,
    /// Ledger endpoint URL
    url: String,
}

impl HttpLedgerClient {
    /// Create a new client with a per-request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LedgerError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LedgerError::Client(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl LedgerClient for HttpLedgerClient {
    async fn deliver(&self, record: &LedgerRecord) -> Result<LedgerResponse, LedgerError> {
        debug!(kind = %record.phase(), uni_id = %record.uni_id(), url = %self.url, "posting record");

        let response = self
            .client
            .post(&self.url)
            .json(record)
            .send()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        debug!(status, body = %body, "ledger answered");

        Ok(LedgerResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Commitment;
    use crate::protocol::{CommitRecord, Identity};

    fn record() -> LedgerRecord {
        LedgerRecord::Commit(CommitRecord {
            uni_id: Identity::new("S001").unwrap(),
            commit: Commitment::from_bytes([7u8; 32]),
        })
    }

    #[tokio::test]
    async fn test_unreachable_ledger_is_transport_error() {
        // Grab a free port, then close it so nothing is listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            HttpLedgerClient::new(format!("http://{addr}/exec"), Duration::from_secs(2)).unwrap();
        let err = client.deliver(&record()).await.unwrap_err();

        assert!(matches!(err, LedgerError::Transport(_)));
        assert!(err.to_string().starts_with("Network error:"));
    }

    #[tokio::test]
    async fn test_malformed_url_is_transport_error() {
        let client = HttpLedgerClient::new("not a url", Duration::from_secs(1)).unwrap();
        assert!(matches!(
            client.deliver(&record()).await,
            Err(LedgerError::Transport(_))
        ));
    }
}
