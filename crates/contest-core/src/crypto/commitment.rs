//! Preimage and Commitment for the commit-reveal scheme.

use crate::protocol::{Choice, Identity, Nonce};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Separator between the three preimage fields.
pub const PREIMAGE_DELIMITER: char = '|';

/// Errors from parsing a hex-encoded commitment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitmentError {
    #[error("commitment must be 64 hex characters, got {0}")]
    InvalidLength(usize),

    #[error("commitment is not valid hex: {0}")]
    InvalidHex(String),
}

/// Clear hash input: `"{identity}|{choice}|{nonce}"`
///
/// Field order, delimiter and the decimal rendering of the choice are fixed.
/// Changing any of them breaks every commitment already on the ledger.
#[derive(Clone, PartialEq, Eq)]
pub struct Preimage(String);

impl Preimage {
    /// Build the preimage from validated fields
    pub fn new(identity: &Identity, choice: Choice, nonce: &Nonce) -> Self {
        Self(format!(
            "{}{PREIMAGE_DELIMITER}{}{PREIMAGE_DELIMITER}{}",
            identity.as_str(),
            choice.value(),
            nonce.as_str()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hash this preimage into its commitment
    pub fn commitment(&self) -> Commitment {
        Commitment::of(self)
    }
}

impl fmt::Debug for Preimage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The preimage contains the nonce, keep it out of logs.
        write!(f, "Preimage({} bytes)", self.0.len())
    }
}

impl fmt::Display for Preimage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Commitment = SHA256(preimage as UTF-8)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Commitment([u8; 32]);

impl Commitment {
    /// Hash a preimage
    pub fn of(preimage: &Preimage) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(preimage.as_str().as_bytes());
        Self(hasher.finalize().into())
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex, 64 characters
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a 64-character hex digest. Upper and lower case are accepted.
    pub fn parse_hex(s: &str) -> Result<Self, CommitmentError> {
        let s = s.trim();
        if s.len() != 64 {
            return Err(CommitmentError::InvalidLength(s.len()));
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| CommitmentError::InvalidHex(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Check that the preimage hashes to this commitment
    pub fn verify(&self, preimage: &Preimage) -> bool {
        *self == Self::of(preimage)
    }
}

impl FromStr for Commitment {
    type Err = CommitmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Commitment {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Commitment {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let hex_str = String::deserialize(d)?;
        Self::parse_hex(&hex_str).map_err(serde::de::Error::custom)
    }
}
