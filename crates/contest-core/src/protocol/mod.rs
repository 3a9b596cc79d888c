//! Protocol types and ledger records.

mod records;
mod types;

pub use records::{CommitRecord, LedgerRecord, RevealRecord};
pub use types::{Choice, Identity, Nonce, Phase, MAX_CHOICE, MIN_CHOICE};
