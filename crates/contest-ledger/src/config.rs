//! Service configuration from the environment.

use beauty_contest_core::config::{default_commit_deadline, parse_deadline, DEADLINE_ENV};
use beauty_contest_core::{ConfigError, LedgerPolicy};

pub const PORT_ENV: &str = "PORT";
pub const REVEAL_WINDOW_ENV: &str = "LEDGER_ENFORCE_REVEAL_WINDOW";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub port: u16,
    pub policy: LedgerPolicy,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup(PORT_ENV)
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let commit_deadline = match lookup(DEADLINE_ENV) {
            Some(value) => parse_deadline(&value)?,
            None => default_commit_deadline(),
        };

        let enforce_reveal_window = lookup(REVEAL_WINDOW_ENV)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            port,
            policy: LedgerPolicy {
                commit_deadline: Some(commit_deadline),
                enforce_reveal_window,
            },
        })
    }
}
