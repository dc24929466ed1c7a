//! Shared application state for the Axum API server.

use jobsignal_common::config::AppConfig;
use jobsignal_notify::notifier::Notifier;
use jobsignal_notify::reconcile::PaymentReconciler;

/// Application state shared across all route handlers via Axum `State`.
///
/// Services carry their collaborators behind trait objects, so tests
/// build this with doubles instead of live providers.
#[derive(Clone)]
pub struct AppState {
    pub reconciler: PaymentReconciler,
    pub notifier: Notifier,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(reconciler: PaymentReconciler, notifier: Notifier, config: AppConfig) -> Self {
        Self {
            reconciler,
            notifier,
            config,
        }
    }
}
