//! HTTP API handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use beauty_contest_core::ledger::{CommitEntry, ContestResults, RevealEntry};
use beauty_contest_core::LedgerRecord;
use serde::Serialize;
use tracing::info;

use crate::state::AppState;

// ============ Response types ============

#[derive(Serialize)]
pub struct CommitsResponse {
    pub commits: Vec<CommitEntry>,
}

#[derive(Serialize)]
pub struct RevealsResponse {
    pub reveals: Vec<RevealEntry>,
}

// ============ Ledger handlers ============

/// Append a commit or reveal. Answers plain text, as the client shows the
/// body verbatim.
pub async fn submit_record(
    State(state): State<AppState>,
    Json(record): Json<LedgerRecord>,
) -> impl IntoResponse {
    info!(kind = %record.phase(), uni_id = %record.uni_id(), "record received");

    match state.append(&record) {
        Ok(appended) => (StatusCode::OK, appended.to_string()),
        Err(rejection) => {
            let status = StatusCode::from_u16(rejection.status_code())
                .unwrap_or(StatusCode::BAD_REQUEST);
            (status, rejection.to_string())
        }
    }
}

pub async fn list_commits(State(state): State<AppState>) -> Json<CommitsResponse> {
    Json(CommitsResponse {
        commits: state.commits(),
    })
}

pub async fn list_reveals(State(state): State<AppState>) -> Json<RevealsResponse> {
    Json(RevealsResponse {
        reveals: state.reveals(),
    })
}

pub async fn get_results(State(state): State<AppState>) -> Json<ContestResults> {
    Json(state.results())
}

pub async fn health() -> &'static str {
    "ok"
}
