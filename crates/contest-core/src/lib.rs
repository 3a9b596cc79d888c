//! Beauty Contest Core Library
//!
//! This crate provides the commit-reveal protocol used by the classroom
//! beauty contest: preimage and commitment derivation, ledger records,
//! the input validation gate, reveal verification and ledger clients.

pub mod builder;
pub mod config;
pub mod crypto;
pub mod ledger;
pub mod protocol;
pub mod submit;
pub mod validation;
pub mod verify;

pub use builder::{build_commit, build_reveal, CommitReceipt};
pub use config::{ConfigError, ContestConfig};
pub use crypto::{Commitment, CommitmentError, Preimage};
pub use ledger::{
    HttpLedgerClient, Ledger, LedgerClient, LedgerError, LedgerPolicy, LedgerRejection,
    LedgerResponse, MockLedger,
};
pub use protocol::{Choice, CommitRecord, Identity, LedgerRecord, Nonce, Phase, RevealRecord};
pub use submit::{CommitSubmission, RevealSubmission, SubmitError, Submitter};
pub use validation::{validate, RawSubmission, ValidatedSubmission, ValidationError};
pub use verify::{verify_reveal, Verification};
