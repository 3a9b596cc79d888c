//! Beauty Contest participant client
//!
//! Commit a hidden number before the deadline, reveal it afterwards.

mod output;

use anyhow::Context;
use beauty_contest_core::{
    build_commit, config, Choice, CommitReceipt, Commitment, ContestConfig, HttpLedgerClient,
    Identity, Nonce, RawSubmission, Submitter, ValidationError,
};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use rand::distributions::{Alphanumeric, DistString};
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(version, about = "Commit-reveal client for the classroom beauty contest")]
struct Cli {
    /// Ledger endpoint URL, provided by the instructor
    #[arg(long, global = true, env = config::API_ENV)]
    api: Option<String>,

    /// Commit deadline as an RFC 3339 instant
    #[arg(long, global = true, env = config::DEADLINE_ENV)]
    deadline: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send a commitment to the ledger (before the deadline)
    Commit(EntryArgs),
    /// Send the clear values for verification (after the deadline)
    Reveal {
        #[command(flatten)]
        entry: EntryArgs,
        /// Commitment recorded at commit time; the reveal is checked locally first
        #[arg(long)]
        expect: Option<Commitment>,
        /// Send the reveal even if the local check fails
        #[arg(long, requires = "expect")]
        force: bool,
    },
    /// Print the preimage and commitment without sending anything
    Preimage(EntryArgs),
    /// Check values against a recorded commitment, offline
    Verify {
        #[command(flatten)]
        entry: EntryArgs,
        #[arg(long)]
        commitment: Commitment,
    },
    /// Suggest a random nonce
    Nonce {
        #[arg(long, default_value_t = 12)]
        length: usize,
    },
    /// Show the commit deadline and whether the window is open
    Deadline,
}

#[derive(Args)]
struct EntryArgs {
    /// Your university ID
    #[arg(long = "id")]
    uni_id: String,

    /// Your number, 0 to 100
    #[arg(long, allow_negative_numbers = true)]
    number: i64,

    /// Your secret nonce; keep it, you need it to reveal
    #[arg(long, env = config::NONCE_ENV, hide_env_values = true)]
    nonce: String,
}

impl EntryArgs {
    fn raw(&self) -> RawSubmission {
        RawSubmission::new(self.uni_id.as_str(), self.number, self.nonce.as_str())
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ContestConfig> {
    let mut cfg = ContestConfig::from_env().context("reading configuration")?;
    if let Some(api) = &cli.api {
        cfg = cfg.with_endpoint(api.as_str());
    }
    if let Some(deadline) = &cli.deadline {
        cfg = cfg.with_deadline(config::parse_deadline(deadline)?);
    }
    if let Some(secs) = cli.timeout {
        cfg = cfg.with_timeout(Duration::from_secs(secs));
    }
    Ok(cfg)
}

/// Build the receipt with no network access, so no deadline or endpoint check
fn offline_receipt(entry: &EntryArgs) -> Result<CommitReceipt, ValidationError> {
    let identity = Identity::new(&entry.uni_id)?;
    let choice = Choice::new(entry.number)?;
    let nonce = Nonce::new(&entry.nonce)?;
    Ok(build_commit(&identity, choice, &nonce))
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let cfg = load_config(&cli)?;
    let now = Utc::now();
    debug!(endpoint = %cfg.endpoint, deadline = %cfg.commit_deadline, "configuration loaded");

    match &cli.command {
        Command::Commit(entry) => {
            let client = HttpLedgerClient::new(cfg.endpoint.as_str(), cfg.timeout)?;
            let submitter = Submitter::new(client, cfg);
            let result = submitter.commit(&entry.raw(), now).await;
            Ok(output::commit_result(&result).emit())
        }
        Command::Reveal {
            entry,
            expect,
            force,
        } => {
            let client = HttpLedgerClient::new(cfg.endpoint.as_str(), cfg.timeout)?;
            let submitter = Submitter::new(client, cfg);
            let result = if *force {
                submitter.force_reveal(&entry.raw(), expect.as_ref(), now).await
            } else {
                submitter.reveal(&entry.raw(), expect.as_ref(), now).await
            };
            Ok(output::reveal_result(&result).emit())
        }
        Command::Preimage(entry) => match offline_receipt(entry) {
            Ok(receipt) => {
                print!("{}", output::receipt(&receipt));
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => Ok(output::warning(&e).emit()),
        },
        Command::Verify { entry, commitment } => match offline_receipt(entry) {
            Ok(receipt) if receipt.commitment == *commitment => {
                println!("MATCH: {} hashes to {}", receipt.preimage, commitment);
                Ok(ExitCode::SUCCESS)
            }
            Ok(receipt) => {
                println!(
                    "MISMATCH: {} hashes to {}, not {}",
                    receipt.preimage, receipt.commitment, commitment
                );
                Ok(ExitCode::FAILURE)
            }
            Err(e) => Ok(output::warning(&e).emit()),
        },
        Command::Nonce { length } => {
            let nonce = Alphanumeric.sample_string(&mut rand::thread_rng(), (*length).max(1));
            println!("{nonce}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Deadline => {
            print!("{}", output::deadline(&cfg, now));
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run(Cli::parse()).await
}
