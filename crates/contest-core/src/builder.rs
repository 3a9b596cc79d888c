//! Commit and reveal builders.
//!
//! Both builders take already-validated values and cannot fail. The only way
//! to get those values from user input is [`crate::validation::validate`].

use crate::crypto::{Commitment, Preimage};
use crate::protocol::{Choice, CommitRecord, Identity, Nonce, RevealRecord};

/// Everything produced at commit time
///
/// The preimage and commitment are the participant's only durable record of
/// their choice and nonce, so callers must show both.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitReceipt {
    pub preimage: Preimage,
    pub commitment: Commitment,
    pub record: CommitRecord,
}

/// Derive the preimage, its commitment and the commit record
pub fn build_commit(identity: &Identity, choice: Choice, nonce: &Nonce) -> CommitReceipt {
    let preimage = Preimage::new(identity, choice, nonce);
    let commitment = preimage.commitment();

    CommitReceipt {
        record: CommitRecord {
            uni_id: identity.clone(),
            commit: commitment,
        },
        preimage,
        commitment,
    }
}

/// Build the reveal record. No hashing happens here; the ledger recomputes
/// the commitment from these clear values.
pub fn build_reveal(identity: &Identity, choice: Choice, nonce: &Nonce) -> RevealRecord {
    RevealRecord {
        uni_id: identity.clone(),
        number: choice,
        nonce: nonce.clone(),
    }
}
