//! Protocol types.

use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest choice a participant may commit to
pub const MIN_CHOICE: i64 = 0;
/// Highest choice a participant may commit to
pub const MAX_CHOICE: i64 = 100;

/// Participant identifier (`uni_id`), stored trimmed and never empty
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingIdentity);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identity {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.0)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The secret number, 0 to 100 inclusive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Choice(u8);

impl Choice {
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if !(MIN_CHOICE..=MAX_CHOICE).contains(&value) {
            return Err(ValidationError::OutOfRange(value));
        }
        // In range, so the cast is lossless.
        Ok(Self(value as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Choice {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Choice> for u8 {
    fn from(choice: Choice) -> Self {
        choice.0
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Participant-chosen salt, stored trimmed and never empty
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nonce(String);

impl Nonce {
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingNonce);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Nonce {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Nonce> for String {
    fn from(nonce: Nonce) -> Self {
        nonce.0
    }
}

impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Nonce(..)")
    }
}

/// Which half of the protocol a submission belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Commit,
    Reveal,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Commit => "commit",
            Phase::Reveal => "reveal",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_trimmed() {
        let id = Identity::new("  A123 \n").unwrap();
        assert_eq!(id.as_str(), "A123");
    }

    #[test]
    fn test_identity_blank_rejected() {
        assert_eq!(Identity::new(""), Err(ValidationError::MissingIdentity));
        assert_eq!(Identity::new("  \t "), Err(ValidationError::MissingIdentity));
    }

    #[test]
    fn test_choice_bounds() {
        assert_eq!(Choice::new(0).unwrap().value(), 0);
        assert_eq!(Choice::new(100).unwrap().value(), 100);
        assert_eq!(Choice::new(-1), Err(ValidationError::OutOfRange(-1)));
        assert_eq!(Choice::new(101), Err(ValidationError::OutOfRange(101)));
    }

    #[test]
    fn test_choice_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Choice>("42").is_ok());
        assert!(serde_json::from_str::<Choice>("101").is_err());
        assert!(serde_json::from_str::<Choice>("-1").is_err());
    }

    #[test]
    fn test_nonce_blank_rejected() {
        assert_eq!(Nonce::new(" "), Err(ValidationError::MissingNonce));
        assert_eq!(Nonce::new(" x ").unwrap().as_str(), "x");
    }

    #[test]
    fn test_nonce_debug_is_masked() {
        let nonce = Nonce::new("purple").unwrap();
        assert_eq!(format!("{nonce:?}"), "Nonce(..)");
    }

    #[test]
    fn test_phase_str() {
        assert_eq!(Phase::Commit.as_str(), "commit");
        assert_eq!(Phase::Reveal.to_string(), "reveal");
    }
}
