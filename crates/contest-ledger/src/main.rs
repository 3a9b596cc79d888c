//! Beauty Contest Ledger Service
//!
//! Append-only ledger with reveal verification and public logs.

use beauty_contest_ledger::{config::ServiceConfig, create_router, AppState};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServiceConfig::from_env()?;
    if let Some(deadline) = config.policy.commit_deadline {
        tracing::info!("Commit deadline: {}", deadline.to_rfc3339());
    }
    if config.policy.enforce_reveal_window {
        tracing::info!("Reveals are refused before the deadline");
    } else {
        tracing::info!("Reveal window not enforced (set LEDGER_ENFORCE_REVEAL_WINDOW=1 to enable)");
    }

    let app = create_router(AppState::new(config.policy));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Ledger service starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
