//! Input validation gate.
//!
//! Every submission passes through [`validate`] before a builder sees it.
//! Checks run in a fixed order and stop at the first failure.

use crate::config::ContestConfig;
use crate::protocol::{Choice, Identity, Nonce, Phase};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// User-correctable input problems. Nothing is built or sent when one occurs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("commit window closed: deadline was {deadline}")]
    CommitWindowClosed { deadline: DateTime<Utc> },

    #[error("missing identity")]
    MissingIdentity,

    #[error("out of range: {0} is not between 0 and 100")]
    OutOfRange(i64),

    #[error("missing nonce")]
    MissingNonce,

    #[error("missing endpoint")]
    MissingEndpoint,
}

/// Raw form input, as typed by the participant
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawSubmission {
    pub uni_id: String,
    pub number: i64,
    pub nonce: String,
}

impl RawSubmission {
    pub fn new(uni_id: impl Into<String>, number: i64, nonce: impl Into<String>) -> Self {
        Self {
            uni_id: uni_id.into(),
            number,
            nonce: nonce.into(),
        }
    }
}

/// Input that passed the gate
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedSubmission {
    pub phase: Phase,
    pub identity: Identity,
    pub choice: Choice,
    pub nonce: Nonce,
}

/// Run the gate for one attempt
///
/// The deadline applies to commits only. Reveals are never time-gated here;
/// the ledger may enforce its own reveal window.
pub fn validate(
    phase: Phase,
    raw: &RawSubmission,
    config: &ContestConfig,
    now: DateTime<Utc>,
) -> Result<ValidatedSubmission, ValidationError> {
    if phase == Phase::Commit && !config.commit_window_open(now) {
        return Err(ValidationError::CommitWindowClosed {
            deadline: config.commit_deadline,
        });
    }

    let identity = Identity::new(&raw.uni_id)?;
    let choice = Choice::new(raw.number)?;
    let nonce = Nonce::new(&raw.nonce)?;

    if config.endpoint.trim().is_empty() {
        return Err(ValidationError::MissingEndpoint);
    }

    Ok(ValidatedSubmission {
        phase,
        identity,
        choice,
        nonce,
    })
}
