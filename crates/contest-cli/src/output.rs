//! Terminal output for the participant.
//!
//! Every commit attempt that got past validation prints the preimage and
//! commitment, whatever happened on the network afterwards.

use beauty_contest_core::{
    CommitReceipt, CommitSubmission, ContestConfig, RevealSubmission, SubmitError,
    ValidationError, Verification,
};
use chrono::{DateTime, Utc};
use std::fmt::Write;
use std::process::ExitCode;

/// Text for stdout and stderr plus the exit status
#[derive(Debug, Default)]
pub struct Report {
    pub out: String,
    pub err: String,
    pub code: u8,
}

impl Report {
    pub fn emit(self) -> ExitCode {
        print!("{}", self.out);
        eprint!("{}", self.err);
        ExitCode::from(self.code)
    }
}

pub fn receipt(receipt: &CommitReceipt) -> String {
    format!(
        "Your PREIMAGE (save it!):\n    {}\nYour COMMIT hash:\n    {}\n",
        receipt.preimage, receipt.commitment
    )
}

pub fn warning(err: &ValidationError) -> Report {
    let err = match err {
        ValidationError::CommitWindowClosed { deadline } => {
            format!("Commit window is CLOSED (deadline {})\n", utc(deadline))
        }
        other => format!("Warning: {other}\n"),
    };
    Report {
        err,
        code: 2,
        ..Report::default()
    }
}

fn failure(err: &SubmitError) -> Report {
    let text = match err {
        SubmitError::Validation(e) => return warning(e),
        SubmitError::PrecheckFailed { expected, actual } => format!(
            "These values do not reproduce your recorded commitment.\n    recorded: {expected}\n    computed: {actual}\nNothing was sent. Check your ID, number and nonce (case matters).\n"
        ),
        SubmitError::Transport { .. } => {
            format!("{err}\nNothing was recorded. Keep the values above and try again.\n")
        }
        SubmitError::Rejected { .. } => format!("{err}\n"),
    };
    Report {
        err: text,
        code: 1,
        ..Report::default()
    }
}

pub fn commit_result(result: &Result<CommitSubmission, SubmitError>) -> Report {
    match result {
        Ok(done) => Report {
            out: format!(
                "{}Server {}: {}\n",
                receipt(&done.receipt),
                done.response.status,
                done.response.body
            ),
            ..Report::default()
        },
        Err(e) => {
            let mut report = failure(e);
            if let Some(r) = e.receipt() {
                report.out = receipt(r);
            }
            report
        }
    }
}

pub fn reveal_result(result: &Result<RevealSubmission, SubmitError>) -> Report {
    match result {
        Ok(done) => {
            let mut report = Report::default();
            match &done.precheck {
                Some(Verification::Match) => {
                    report.out += "Local check: values match your recorded commitment.\n";
                }
                Some(Verification::Mismatch { expected, actual }) => {
                    let _ = writeln!(
                        report.err,
                        "Warning: sent anyway, but these values hash to {actual}, not {expected}."
                    );
                }
                None => {}
            }
            let _ = writeln!(
                report.out,
                "Server {}: {}",
                done.response.status, done.response.body
            );
            report
        }
        Err(e) => failure(e),
    }
}

pub fn deadline(cfg: &ContestConfig, now: DateTime<Utc>) -> String {
    let mut out = format!("Commit deadline (UTC): {}\n", utc(&cfg.commit_deadline));
    if cfg.commit_window_open(now) {
        let left = cfg.commit_deadline - now;
        let _ = writeln!(
            out,
            "Commit window is OPEN ({}h {:02}m left)",
            left.num_hours(),
            left.num_minutes() % 60
        );
    } else {
        out += "Commit window is CLOSED. Reveals are open.\n";
    }
    out
}

fn utc(at: &DateTime<Utc>) -> String {
    at.format("%d %b %Y %H:%M:%S").to_string()
}
