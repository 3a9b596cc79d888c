//! Ledger records.
//!
//! These are the exact JSON bodies posted to the ledger. The `kind` tag and
//! the field names are part of the wire contract with the ledger script.

use crate::crypto::{Commitment, Preimage};
use crate::protocol::{Choice, Identity, Nonce, Phase};
use serde::{Deserialize, Serialize};

/// Commit phase: identity and hash only
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub uni_id: Identity,
    pub commit: Commitment,
}

/// Reveal phase: clear values so the ledger can recompute the commitment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealRecord {
    pub uni_id: Identity,
    pub number: Choice,
    pub nonce: Nonce,
}

impl RevealRecord {
    /// Rebuild the preimage the participant hashed at commit time
    pub fn preimage(&self) -> Preimage {
        Preimage::new(&self.uni_id, self.number, &self.nonce)
    }
}

/// Any record the ledger accepts
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LedgerRecord {
    Commit(CommitRecord),
    Reveal(RevealRecord),
}

impl LedgerRecord {
    pub fn phase(&self) -> Phase {
        match self {
            LedgerRecord::Commit(_) => Phase::Commit,
            LedgerRecord::Reveal(_) => Phase::Reveal,
        }
    }

    pub fn uni_id(&self) -> &Identity {
        match self {
            LedgerRecord::Commit(record) => &record.uni_id,
            LedgerRecord::Reveal(record) => &record.uni_id,
        }
    }
}

impl From<CommitRecord> for LedgerRecord {
    fn from(record: CommitRecord) -> Self {
        LedgerRecord::Commit(record)
    }
}

impl From<RevealRecord> for LedgerRecord {
    fn from(record: RevealRecord) -> Self {
        LedgerRecord::Reveal(record)
    }
}
