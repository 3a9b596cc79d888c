//! Reveal verification.
//!
//! The ledger is the authority, but the check itself is the same pure
//! function everywhere: rebuild the preimage from the reveal, hash it and
//! compare with the stored commitment.

use crate::crypto::Commitment;
use crate::protocol::RevealRecord;
use serde::Serialize;

/// Outcome of checking a reveal against a stored commitment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Verification {
    Match,
    Mismatch {
        expected: Commitment,
        actual: Commitment,
    },
}

impl Verification {
    pub fn is_match(&self) -> bool {
        matches!(self, Verification::Match)
    }
}

/// Check a reveal against the commitment stored for its identity
pub fn verify_reveal(stored: &Commitment, reveal: &RevealRecord) -> Verification {
    let actual = reveal.preimage().commitment();
    if actual == *stored {
        Verification::Match
    } else {
        Verification::Mismatch {
            expected: *stored,
            actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build_commit, build_reveal};
    use crate::protocol::{Choice, Identity, Nonce};

    fn reveal(id: &str, n: i64, nonce: &str) -> RevealRecord {
        build_reveal(
            &Identity::new(id).unwrap(),
            Choice::new(n).unwrap(),
            &Nonce::new(nonce).unwrap(),
        )
    }

    fn stored(id: &str, n: i64, nonce: &str) -> Commitment {
        build_commit(
            &Identity::new(id).unwrap(),
            Choice::new(n).unwrap(),
            &Nonce::new(nonce).unwrap(),
        )
        .commitment
    }

    #[test]
    fn test_matching_reveal() {
        let commitment = stored("S001", 7, "purple");
        assert_eq!(
            verify_reveal(&commitment, &reveal("S001", 7, "purple")),
            Verification::Match
        );
    }

    #[test]
    fn test_nonce_case_mismatch() {
        let commitment = stored("S001", 7, "purple");
        let result = verify_reveal(&commitment, &reveal("S001", 7, "Purple"));

        match result {
            Verification::Mismatch { expected, actual } => {
                assert_eq!(expected, commitment);
                assert_eq!(
                    actual.to_hex(),
                    "f17121b9b022fcbeb7c54c10a9d8e9bec1e87ff8741bfbecf00cf18e0c01fb48"
                );
            }
            Verification::Match => panic!("case-changed nonce must not match"),
        }
    }

    #[test]
    fn test_wrong_number_or_identity_mismatch() {
        let commitment = stored("A123", 42, "x");
        assert!(!verify_reveal(&commitment, &reveal("A123", 43, "x")).is_match());
        assert!(!verify_reveal(&commitment, &reveal("A124", 42, "x")).is_match());
    }

    #[test]
    fn test_trimmed_reveal_still_matches() {
        let commitment = stored("S002", 50, "blue");
        assert!(verify_reveal(&commitment, &reveal(" S002 ", 50, " blue ")).is_match());
    }
}
