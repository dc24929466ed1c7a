//! Payment provider webhook intake.
//!
//! The provider enforces a short response deadline and redelivers on a
//! late ack, so the handler fixes its transport outcome first and runs
//! reconciliation as a spawned continuation with no return channel.
//! Correctness lives in the idempotent downstream handling, not here.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;

use jobsignal_notify::reconcile::WebhookEvent;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/webhooks/payments", post(payment_webhook))
}

/// POST /webhooks/payments — Acknowledge, then reconcile in the background.
///
/// The body is read raw and parsed leniently: an unparseable payload is
/// acknowledged like any other event and ends as an ignored no-op, so
/// the provider never sees anything but `200`.
async fn payment_webhook(State(state): State<AppState>, body: Bytes) -> StatusCode {
    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, "Unparseable webhook body, acknowledging anyway");
            return StatusCode::OK;
        }
    };

    tracing::debug!(kind = ?event.kind, action = ?event.action, "Payment webhook received");

    let reconciler = state.reconciler.clone();
    tokio::spawn(async move {
        reconciler.process(event).await;
    });

    StatusCode::OK
}
