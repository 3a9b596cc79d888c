//! Submission pipeline: validate, build, deliver, classify.

use crate::builder::{build_commit, build_reveal, CommitReceipt};
use crate::config::ContestConfig;
use crate::crypto::Commitment;
use crate::ledger::{LedgerClient, LedgerError, LedgerResponse};
use crate::protocol::{LedgerRecord, Phase, RevealRecord};
use crate::validation::{validate, RawSubmission, ValidationError};
use crate::verify::{verify_reveal, Verification};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

/// Why a submission did not end in an accepted ledger write
///
/// Commit failures after the build step carry the receipt so the participant
/// still sees their preimage and commitment and can retry by hand.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("local check failed: reveal hashes to {actual}, recorded commitment is {expected}")]
    PrecheckFailed {
        expected: Commitment,
        actual: Commitment,
    },

    #[error("{source}")]
    Transport {
        source: LedgerError,
        receipt: Option<CommitReceipt>,
    },

    #[error("Server {status}: {body}")]
    Rejected {
        status: u16,
        body: String,
        receipt: Option<CommitReceipt>,
    },
}

impl SubmitError {
    /// Preimage and commitment computed before the failure, if any
    pub fn receipt(&self) -> Option<&CommitReceipt> {
        match self {
            SubmitError::Transport { receipt, .. } | SubmitError::Rejected { receipt, .. } => {
                receipt.as_ref()
            }
            _ => None,
        }
    }
}

/// Accepted commit
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitSubmission {
    pub receipt: CommitReceipt,
    pub response: LedgerResponse,
}

/// Accepted reveal
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealSubmission {
    pub record: RevealRecord,
    /// Result of the local pre-check, when a commitment was supplied
    pub precheck: Option<Verification>,
    pub response: LedgerResponse,
}

/// Drives one participant's submissions against a ledger client
pub struct Submitter<C> {
    client: C,
    config: ContestConfig,
}

impl<C: LedgerClient> Submitter<C> {
    pub fn new(client: C, config: ContestConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ContestConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Validate and build a commit without sending it
    pub fn prepare_commit(
        &self,
        raw: &RawSubmission,
        now: DateTime<Utc>,
    ) -> Result<CommitReceipt, ValidationError> {
        let input = validate(Phase::Commit, raw, &self.config, now)?;
        Ok(build_commit(&input.identity, input.choice, &input.nonce))
    }

    /// Validate and build a reveal without sending it
    pub fn prepare_reveal(
        &self,
        raw: &RawSubmission,
        now: DateTime<Utc>,
    ) -> Result<RevealRecord, ValidationError> {
        let input = validate(Phase::Reveal, raw, &self.config, now)?;
        Ok(build_reveal(&input.identity, input.choice, &input.nonce))
    }

    /// Commit phase
    pub async fn commit(
        &self,
        raw: &RawSubmission,
        now: DateTime<Utc>,
    ) -> Result<CommitSubmission, SubmitError> {
        let receipt = self.prepare_commit(raw, now)?;
        let record = LedgerRecord::Commit(receipt.record.clone());

        match self.send(&record).await {
            Ok(response) => Ok(CommitSubmission { receipt, response }),
            Err(SubmitError::Transport { source, .. }) => Err(SubmitError::Transport {
                source,
                receipt: Some(receipt),
            }),
            Err(SubmitError::Rejected { status, body, .. }) => Err(SubmitError::Rejected {
                status,
                body,
                receipt: Some(receipt),
            }),
            Err(other) => Err(other),
        }
    }

    /// Reveal phase
    ///
    /// With `expected` set, the reveal is hashed locally first and not sent
    /// if it does not reproduce that commitment.
    pub async fn reveal(
        &self,
        raw: &RawSubmission,
        expected: Option<&Commitment>,
        now: DateTime<Utc>,
    ) -> Result<RevealSubmission, SubmitError> {
        self.reveal_checked(raw, expected, false, now).await
    }

    /// Reveal phase, sending even when the local check fails
    ///
    /// A mismatch is kept in [`RevealSubmission::precheck`]; the ledger has
    /// the final word.
    pub async fn force_reveal(
        &self,
        raw: &RawSubmission,
        expected: Option<&Commitment>,
        now: DateTime<Utc>,
    ) -> Result<RevealSubmission, SubmitError> {
        self.reveal_checked(raw, expected, true, now).await
    }

    async fn reveal_checked(
        &self,
        raw: &RawSubmission,
        expected: Option<&Commitment>,
        force: bool,
        now: DateTime<Utc>,
    ) -> Result<RevealSubmission, SubmitError> {
        let record = self.prepare_reveal(raw, now)?;

        let precheck = expected.map(|stored| verify_reveal(stored, &record));
        if let Some(Verification::Mismatch { expected, actual }) = &precheck {
            if !force {
                warn!(uni_id = %record.uni_id, "reveal does not match recorded commitment, not sending");
                return Err(SubmitError::PrecheckFailed {
                    expected: *expected,
                    actual: *actual,
                });
            }
            warn!(uni_id = %record.uni_id, "reveal does not match recorded commitment, sending anyway");
        }

        let response = self.send(&LedgerRecord::Reveal(record.clone())).await?;
        Ok(RevealSubmission {
            record,
            precheck,
            response,
        })
    }

    async fn send(&self, record: &LedgerRecord) -> Result<LedgerResponse, SubmitError> {
        let response = self
            .client
            .deliver(record)
            .await
            .map_err(|source| SubmitError::Transport {
                source,
                receipt: None,
            })?;

        if response.is_success() {
            info!(kind = %record.phase(), uni_id = %record.uni_id(), status = response.status, "ledger accepted record");
            Ok(response)
        } else {
            warn!(kind = %record.phase(), uni_id = %record.uni_id(), status = response.status, "ledger rejected record");
            Err(SubmitError::Rejected {
                status: response.status,
                body: response.body,
                receipt: None,
            })
        }
    }
}
