//! Direct send — deliver one notification to one user.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use jobsignal_common::error::AppError;
use jobsignal_common::types::NotificationIntent;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/notifications/send", post(send_notification))
}

#[derive(Debug, Deserialize)]
struct SendRequest {
    user_id: Uuid,
    title: String,
    body: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// POST /api/notifications/send — Resolve and deliver to exactly one user.
///
/// A recipient with no registered address is a downstream no-op, not a
/// caller-visible failure.
async fn send_notification(
    State(state): State<AppState>,
    Json(request): Json<SendRequest>,
) -> Result<StatusCode, AppError> {
    if request.title.is_empty() {
        return Err(AppError::Validation("title must not be empty".to_string()));
    }

    let intent = NotificationIntent {
        recipient: request.user_id,
        title: request.title,
        body: request.body,
        payload: request.data.unwrap_or_else(|| serde_json::json!({})),
    };

    let notifier = state.notifier.clone();
    tokio::spawn(async move {
        notifier.notify_user(&intent).await;
    });

    Ok(StatusCode::ACCEPTED)
}
