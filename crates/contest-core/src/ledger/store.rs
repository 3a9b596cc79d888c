//! In-memory append-only ledger.
//!
//! This is the authoritative side of the protocol: it stores commitments,
//! verifies reveals against them and keeps public logs of both. Entries are
//! never updated or removed.

use crate::crypto::Commitment;
use crate::protocol::{Choice, CommitRecord, Identity, LedgerRecord, Nonce, RevealRecord};
use crate::verify::{verify_reveal, Verification};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Reasons the ledger refuses a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerRejection {
    #[error("commit window closed at {0}")]
    CommitWindowClosed(DateTime<Utc>),

    #[error("reveal window opens at {0}")]
    RevealWindowNotOpen(DateTime<Utc>),

    #[error("{0} has already committed")]
    DuplicateCommit(Identity),

    #[error("no commit found for {0}")]
    UnknownIdentity(Identity),

    #[error("{0} has already revealed")]
    AlreadyRevealed(Identity),

    #[error("reveal does not match commit for {uni_id}: expected {expected}, got {actual}")]
    Mismatch {
        uni_id: Identity,
        expected: Commitment,
        actual: Commitment,
    },
}

impl LedgerRejection {
    /// HTTP status the ledger service answers with
    pub fn status_code(&self) -> u16 {
        match self {
            LedgerRejection::CommitWindowClosed(_) | LedgerRejection::RevealWindowNotOpen(_) => {
                403
            }
            LedgerRejection::UnknownIdentity(_) => 404,
            LedgerRejection::DuplicateCommit(_) | LedgerRejection::AlreadyRevealed(_) => 409,
            LedgerRejection::Mismatch { .. } => 422,
        }
    }
}

/// Time rules the ledger enforces on its own
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LedgerPolicy {
    /// Refuse commits at or after this instant
    pub commit_deadline: Option<DateTime<Utc>>,
    /// Refuse reveals before `commit_deadline`
    pub enforce_reveal_window: bool,
}

/// One row of the public commit log
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommitEntry {
    pub index: u64,
    pub id: Uuid,
    pub uni_id: Identity,
    pub commit: Commitment,
    pub recorded_at: DateTime<Utc>,
}

/// One row of the public reveal log. Only verified reveals are logged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RevealEntry {
    pub index: u64,
    pub id: Uuid,
    pub uni_id: Identity,
    pub number: Choice,
    pub nonce: Nonce,
    pub recorded_at: DateTime<Utc>,
}

/// What was appended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Appended {
    Commit { index: u64 },
    Reveal { index: u64 },
}

impl fmt::Display for Appended {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Appended::Commit { index } => write!(f, "commit recorded (#{index})"),
            Appended::Reveal { index } => write!(f, "reveal verified (#{index})"),
        }
    }
}

/// Contest outcome over the verified reveals
///
/// The target is two thirds of the mean. Winners are every identity whose
/// number is closest to the target, in reveal order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContestResults {
    pub participants: usize,
    pub mean: Option<f64>,
    pub target: Option<f64>,
    pub winners: Vec<Identity>,
}

/// Append-only commit and reveal logs
#[derive(Debug, Default)]
pub struct Ledger {
    policy: LedgerPolicy,
    commits: Vec<CommitEntry>,
    reveals: Vec<RevealEntry>,
    /// uni_id -> position in `commits`
    commit_index: HashMap<Identity, usize>,
    revealed: HashSet<Identity>,
}

impl Ledger {
    pub fn new(policy: LedgerPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> &LedgerPolicy {
        &self.policy
    }

    /// Append any record
    pub fn append(
        &mut self,
        record: &LedgerRecord,
        at: DateTime<Utc>,
    ) -> Result<Appended, LedgerRejection> {
        match record {
            LedgerRecord::Commit(commit) => self.append_commit(commit, at),
            LedgerRecord::Reveal(reveal) => self.append_reveal(reveal, at),
        }
    }

    /// Store a commitment. One commit per identity.
    pub fn append_commit(
        &mut self,
        record: &CommitRecord,
        at: DateTime<Utc>,
    ) -> Result<Appended, LedgerRejection> {
        if let Some(deadline) = self.policy.commit_deadline {
            if at >= deadline {
                return Err(LedgerRejection::CommitWindowClosed(deadline));
            }
        }
        if self.commit_index.contains_key(&record.uni_id) {
            warn!(uni_id = %record.uni_id, "duplicate commit refused");
            return Err(LedgerRejection::DuplicateCommit(record.uni_id.clone()));
        }

        let index = self.commits.len() as u64;
        self.commits.push(CommitEntry {
            index,
            id: Uuid::new_v4(),
            uni_id: record.uni_id.clone(),
            commit: record.commit,
            recorded_at: at,
        });
        self.commit_index
            .insert(record.uni_id.clone(), self.commits.len() - 1);

        info!(uni_id = %record.uni_id, index, "commit recorded");
        Ok(Appended::Commit { index })
    }

    /// Verify a reveal against the stored commitment and log it on a match
    pub fn append_reveal(
        &mut self,
        record: &RevealRecord,
        at: DateTime<Utc>,
    ) -> Result<Appended, LedgerRejection> {
        if self.policy.enforce_reveal_window {
            if let Some(deadline) = self.policy.commit_deadline {
                if at < deadline {
                    return Err(LedgerRejection::RevealWindowNotOpen(deadline));
                }
            }
        }

        let stored = self
            .commitment_for(&record.uni_id)
            .ok_or_else(|| LedgerRejection::UnknownIdentity(record.uni_id.clone()))?;

        if self.revealed.contains(&record.uni_id) {
            return Err(LedgerRejection::AlreadyRevealed(record.uni_id.clone()));
        }

        if let Verification::Mismatch { expected, actual } = verify_reveal(&stored, record) {
            warn!(uni_id = %record.uni_id, "reveal does not match commitment");
            return Err(LedgerRejection::Mismatch {
                uni_id: record.uni_id.clone(),
                expected,
                actual,
            });
        }

        let index = self.reveals.len() as u64;
        self.reveals.push(RevealEntry {
            index,
            id: Uuid::new_v4(),
            uni_id: record.uni_id.clone(),
            number: record.number,
            nonce: record.nonce.clone(),
            recorded_at: at,
        });
        self.revealed.insert(record.uni_id.clone());

        info!(uni_id = %record.uni_id, index, "reveal verified");
        Ok(Appended::Reveal { index })
    }

    /// Stored commitment for an identity
    pub fn commitment_for(&self, uni_id: &Identity) -> Option<Commitment> {
        self.commit_index
            .get(uni_id)
            .map(|&pos| self.commits[pos].commit)
    }

    pub fn commits(&self) -> &[CommitEntry] {
        &self.commits
    }

    pub fn reveals(&self) -> &[RevealEntry] {
        &self.reveals
    }

    /// Two-thirds-of-the-mean winners over verified reveals
    pub fn results(&self) -> ContestResults {
        let participants = self.reveals.len();
        if participants == 0 {
            return ContestResults {
                participants,
                mean: None,
                target: None,
                winners: Vec::new(),
            };
        }

        let count = participants as i64;
        let sum: i64 = self
            .reveals
            .iter()
            .map(|r| i64::from(r.number.value()))
            .sum();

        // Compare |n - 2*sum/(3*count)| scaled by 3*count to stay in integers.
        let distance = |n: u8| (3 * count * i64::from(n) - 2 * sum).abs();
        let best = self
            .reveals
            .iter()
            .map(|r| distance(r.number.value()))
            .min()
            .unwrap_or(0);

        let winners = self
            .reveals
            .iter()
            .filter(|r| distance(r.number.value()) == best)
            .map(|r| r.uni_id.clone())
            .collect();

        let mean = sum as f64 / count as f64;
        ContestResults {
            participants,
            mean: Some(mean),
            target: Some(mean * 2.0 / 3.0),
            winners,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build_commit, build_reveal};
    use chrono::{Duration, TimeZone};

    fn deadline() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 30, 22, 59, 59).unwrap()
    }

    fn commit(id: &str, n: i64, nonce: &str) -> CommitRecord {
        build_commit(
            &Identity::new(id).unwrap(),
            Choice::new(n).unwrap(),
            &Nonce::new(nonce).unwrap(),
        )
        .record
    }

    fn reveal(id: &str, n: i64, nonce: &str) -> RevealRecord {
        build_reveal(
            &Identity::new(id).unwrap(),
            Choice::new(n).unwrap(),
            &Nonce::new(nonce).unwrap(),
        )
    }

    fn id(s: &str) -> Identity {
        Identity::new(s).unwrap()
    }

    #[test]
    fn test_commit_then_reveal() {
        let mut ledger = Ledger::default();
        let now = deadline();

        assert_eq!(
            ledger.append_commit(&commit("S001", 7, "purple"), now),
            Ok(Appended::Commit { index: 0 })
        );
        assert_eq!(
            ledger.append_reveal(&reveal("S001", 7, "purple"), now),
            Ok(Appended::Reveal { index: 0 })
        );

        assert_eq!(ledger.commits().len(), 1);
        assert_eq!(ledger.reveals()[0].number.value(), 7);
    }

    #[test]
    fn test_duplicate_commit_rejected() {
        let mut ledger = Ledger::default();
        let now = deadline();
        ledger.append_commit(&commit("S001", 7, "purple"), now).unwrap();

        let err = ledger
            .append_commit(&commit("S001", 8, "other"), now)
            .unwrap_err();
        assert_eq!(err, LedgerRejection::DuplicateCommit(id("S001")));
        assert_eq!(err.status_code(), 409);
        // First commitment is kept.
        assert_eq!(
            ledger.commitment_for(&id("S001")),
            Some(commit("S001", 7, "purple").commit)
        );
    }

    #[test]
    fn test_reveal_without_commit_rejected() {
        let mut ledger = Ledger::default();
        let err = ledger
            .append_reveal(&reveal("S009", 1, "x"), deadline())
            .unwrap_err();
        assert_eq!(err, LedgerRejection::UnknownIdentity(id("S009")));
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_mismatched_reveal_rejected_and_not_logged() {
        let mut ledger = Ledger::default();
        let now = deadline();
        ledger.append_commit(&commit("S001", 7, "purple"), now).unwrap();

        let err = ledger
            .append_reveal(&reveal("S001", 7, "Purple"), now)
            .unwrap_err();
        assert!(matches!(err, LedgerRejection::Mismatch { .. }));
        assert_eq!(err.status_code(), 422);
        assert!(ledger.reveals().is_empty());

        // A correct reveal still goes through afterwards.
        assert!(ledger.append_reveal(&reveal("S001", 7, "purple"), now).is_ok());
    }

    #[test]
    fn test_second_reveal_rejected() {
        let mut ledger = Ledger::default();
        let now = deadline();
        ledger.append_commit(&commit("S001", 7, "purple"), now).unwrap();
        ledger.append_reveal(&reveal("S001", 7, "purple"), now).unwrap();

        assert_eq!(
            ledger.append_reveal(&reveal("S001", 7, "purple"), now),
            Err(LedgerRejection::AlreadyRevealed(id("S001")))
        );
    }

    #[test]
    fn test_policy_commit_deadline() {
        let mut ledger = Ledger::new(LedgerPolicy {
            commit_deadline: Some(deadline()),
            enforce_reveal_window: false,
        });

        assert!(ledger
            .append_commit(&commit("S001", 7, "purple"), deadline() - Duration::seconds(1))
            .is_ok());
        assert_eq!(
            ledger.append_commit(&commit("S002", 50, "blue"), deadline()),
            Err(LedgerRejection::CommitWindowClosed(deadline()))
        );
    }

    #[test]
    fn test_policy_reveal_window() {
        let mut ledger = Ledger::new(LedgerPolicy {
            commit_deadline: Some(deadline()),
            enforce_reveal_window: true,
        });
        let early = deadline() - Duration::minutes(5);
        ledger.append_commit(&commit("S001", 7, "purple"), early).unwrap();

        assert_eq!(
            ledger.append_reveal(&reveal("S001", 7, "purple"), early),
            Err(LedgerRejection::RevealWindowNotOpen(deadline()))
        );
        assert!(ledger
            .append_reveal(&reveal("S001", 7, "purple"), deadline())
            .is_ok());
    }

    #[test]
    fn test_results_two_thirds_of_mean() {
        let mut ledger = Ledger::default();
        let now = deadline();
        for (who, n) in [("A", 20), ("B", 40), ("C", 60)] {
            ledger.append_commit(&commit(who, n, "k"), now).unwrap();
            ledger.append_reveal(&reveal(who, n, "k"), now).unwrap();
        }
        // Unrevealed commits do not count.
        ledger.append_commit(&commit("D", 0, "k"), now).unwrap();

        let results = ledger.results();
        assert_eq!(results.participants, 3);
        assert_eq!(results.mean, Some(40.0));
        // Target 26.67, A at 20 is 6.67 away, B at 40 is 13.33 away.
        assert_eq!(results.winners, vec![id("A")]);
    }

    #[test]
    fn test_results_ties_and_empty() {
        assert_eq!(Ledger::default().results().winners, Vec::<Identity>::new());

        let mut ledger = Ledger::default();
        let now = deadline();
        for (who, n) in [("A", 0), ("B", 0)] {
            ledger.append_commit(&commit(who, n, "k"), now).unwrap();
            ledger.append_reveal(&reveal(who, n, "k"), now).unwrap();
        }
        let results = ledger.results();
        assert_eq!(results.target, Some(0.0));
        assert_eq!(results.winners, vec![id("A"), id("B")]);
    }

    #[test]
    fn test_appended_messages() {
        assert_eq!(Appended::Commit { index: 2 }.to_string(), "commit recorded (#2)");
        assert_eq!(Appended::Reveal { index: 0 }.to_string(), "reveal verified (#0)");
    }
}
