//! Job-status trigger.
//!
//! Called by the client application after it has updated its own view
//! of job state. The fan-out runs as a spawned continuation; the caller
//! only learns about validation failures.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};

use jobsignal_common::error::AppError;
use jobsignal_notify::status::StatusChange;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/jobs/status", post(job_status_changed))
}

/// POST /api/jobs/status — Fan out the notifications a transition implies.
async fn job_status_changed(
    State(state): State<AppState>,
    Json(change): Json<StatusChange>,
) -> Result<StatusCode, AppError> {
    if change.job_id.is_empty() {
        return Err(AppError::Validation("job_id must not be empty".to_string()));
    }
    if change.new_status.is_empty() {
        return Err(AppError::Validation(
            "new_status must not be empty".to_string(),
        ));
    }

    tracing::info!(
        job_id = %change.job_id,
        new_status = %change.new_status,
        "Job status trigger received"
    );

    let notifier = state.notifier.clone();
    tokio::spawn(async move {
        notifier.notify_status_change(&change).await;
    });

    Ok(StatusCode::ACCEPTED)
}
