//! Cryptographic primitives for the commit-reveal protocol.
//!
//! This module provides:
//! - Preimage, the clear `identity|choice|nonce` string
//! - Commitment, the SHA-256 digest binding a participant to a choice

mod commitment;

pub use commitment::{Commitment, CommitmentError, Preimage, PREIMAGE_DELIMITER};
