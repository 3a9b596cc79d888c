//! Contest configuration.
//!
//! Configuration is an immutable value handed to the validation gate and the
//! submitter. Nothing in this crate reads the environment on its own apart
//! from [`ContestConfig::from_env`].

use chrono::{DateTime, TimeZone, Utc};
use std::time::Duration;
use thiserror::Error;

/// Ledger endpoint URL
pub const API_ENV: &str = "BEAUTY_CONTEST_API";
/// Participant nonce, read by the client instead of a command-line flag
pub const NONCE_ENV: &str = "BEAUTY_CONTEST_NONCE";
/// Commit deadline override, RFC 3339
pub const DEADLINE_ENV: &str = "BEAUTY_CONTEST_DEADLINE";
/// Request timeout override, whole seconds
pub const TIMEOUT_ENV: &str = "BEAUTY_CONTEST_TIMEOUT_SECS";

/// Placeholder until the instructor hands out the deployed script URL
pub const DEFAULT_ENDPOINT: &str = "https://script.google.com/macros/s/REPLACE_WITH_YOUR_/exec";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// 2025-11-30 23:59:59 Europe/Paris, which is 22:59:59 UTC
pub fn default_commit_deadline() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 30, 22, 59, 59)
        .single()
        .expect("fixed deadline is a valid UTC instant")
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid BEAUTY_CONTEST_DEADLINE {value:?}: {reason}")]
    InvalidDeadline { value: String, reason: String },

    #[error("invalid BEAUTY_CONTEST_TIMEOUT_SECS {0:?}: expected whole seconds")]
    InvalidTimeout(String),
}

/// Parse an RFC 3339 instant and normalise it to UTC
pub fn parse_deadline(value: &str) -> Result<DateTime<Utc>, ConfigError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ConfigError::InvalidDeadline {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContestConfig {
    /// Ledger endpoint. May be empty here; the validation gate rejects it.
    pub endpoint: String,
    /// Commits at or after this instant are refused
    pub commit_deadline: DateTime<Utc>,
    pub timeout: Duration,
}

impl Default for ContestConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            commit_deadline: default_commit_deadline(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ContestConfig {
    /// Load from the process environment, falling back to the defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(endpoint) = lookup(API_ENV) {
            config.endpoint = endpoint;
        }
        if let Some(deadline) = lookup(DEADLINE_ENV) {
            config.commit_deadline = parse_deadline(&deadline)?;
        }
        if let Some(timeout) = lookup(TIMEOUT_ENV) {
            let secs: u64 = timeout
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(timeout.clone()))?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.commit_deadline = deadline;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Commit window is open strictly before the deadline
    pub fn commit_window_open(&self, now: DateTime<Utc>) -> bool {
        now < self.commit_deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ContestConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.commit_deadline.to_rfc3339(), "2025-11-30T22:59:59+00:00");
        assert_eq!(config.timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_env_overrides() {
        let config = ContestConfig::from_lookup(lookup(&[
            (API_ENV, "http://localhost:3000/"),
            (DEADLINE_ENV, "2026-01-10T12:00:00+01:00"),
            (TIMEOUT_ENV, "3"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint, "http://localhost:3000/");
        assert_eq!(
            config.commit_deadline,
            Utc.with_ymd_and_hms(2026, 1, 10, 11, 0, 0).unwrap()
        );
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_bad_deadline() {
        let err = ContestConfig::from_lookup(lookup(&[(DEADLINE_ENV, "tomorrow")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDeadline { .. }));
    }

    #[test]
    fn test_bad_timeout() {
        let err = ContestConfig::from_lookup(lookup(&[(TIMEOUT_ENV, "fast")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidTimeout("fast".to_string()));
    }

    #[test]
    fn test_commit_window_is_strict() {
        let config = ContestConfig::default();
        let deadline = config.commit_deadline;

        assert!(config.commit_window_open(deadline - chrono::Duration::seconds(1)));
        assert!(!config.commit_window_open(deadline));
        assert!(!config.commit_window_open(deadline + chrono::Duration::seconds(1)));
    }
}
