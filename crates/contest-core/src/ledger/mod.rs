//! Ledger abstraction.
//!
//! The ledger is the external append-only service that stores commits and
//! verifies reveals. This module holds the client trait, the HTTP transport,
//! an in-memory ledger and a mock client built on it.

mod http;
mod mock;
mod store;
mod traits;

pub use http::HttpLedgerClient;
pub use mock::MockLedger;
pub use store::{
    Appended, CommitEntry, ContestResults, Ledger, LedgerPolicy, LedgerRejection, RevealEntry,
};
pub use traits::{LedgerClient, LedgerError, LedgerResponse};
