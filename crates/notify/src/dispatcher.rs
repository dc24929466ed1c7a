//! Push dispatcher — validates, chunks, and delivers a message to a set
//! of addresses, then classifies per-address outcomes.
//!
//! Best-effort, at-most-once: no retries, transient failures surface
//! only as logs. Addresses the provider reports as permanently dead
//! (`DeviceNotRegistered`) are handed to the directory for cleanup.

use std::sync::Arc;

use jobsignal_common::types::{PushError, PushMessage};

use crate::directory::AddressDirectory;
use crate::push::PushProvider;

/// Tally of one `deliver` call, for logs and tests. Callers treat
/// delivery as fire-and-forget and are free to ignore it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeliverySummary {
    /// Addresses that passed validation and were submitted.
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
    /// Addresses cleared from user records as permanently dead.
    pub invalidated: usize,
}

/// Delivers messages to push addresses in provider-sized batches.
#[derive(Clone)]
pub struct PushDispatcher {
    provider: Arc<dyn PushProvider>,
    directory: AddressDirectory,
}

impl PushDispatcher {
    pub fn new(provider: Arc<dyn PushProvider>, directory: AddressDirectory) -> Self {
        Self {
            provider,
            directory,
        }
    }

    /// Deliver `message` to every address that passes the provider's
    /// format check. Zero valid addresses is a logged no-op, not an
    /// error. One chunk's failure never blocks sibling chunks.
    pub async fn deliver(&self, addresses: Vec<String>, message: &PushMessage) -> DeliverySummary {
        let mut summary = DeliverySummary::default();

        let valid: Vec<String> = addresses
            .into_iter()
            .filter(|address| {
                if address.is_empty() || !self.provider.is_valid_address(address) {
                    tracing::warn!(address, "Dropping invalid push address");
                    false
                } else {
                    true
                }
            })
            .collect();

        if valid.is_empty() {
            tracing::info!(title = %message.title, "No valid push addresses, nothing to deliver");
            return summary;
        }

        summary.attempted = valid.len();
        let chunk_size = self.provider.max_batch_size().max(1);
        let mut stale: Vec<String> = Vec::new();

        for chunk in valid.chunks(chunk_size) {
            match self.provider.send_batch(chunk, message).await {
                Ok(outcomes) => {
                    for outcome in outcomes {
                        match outcome.error {
                            None => summary.delivered += 1,
                            Some(PushError::DeviceNotRegistered) => {
                                tracing::warn!(
                                    address = %outcome.address,
                                    "Device no longer registered, scheduling invalidation"
                                );
                                summary.failed += 1;
                                stale.push(outcome.address);
                            }
                            Some(error) => {
                                tracing::warn!(
                                    address = %outcome.address,
                                    error = %error,
                                    "Push delivery failed for address"
                                );
                                summary.failed += 1;
                            }
                        }
                    }
                }
                Err(e) => {
                    // The whole chunk failed to submit; remaining chunks
                    // still get their attempt.
                    tracing::error!(
                        chunk_size = chunk.len(),
                        error = %e,
                        "Push chunk submission failed"
                    );
                    summary.failed += chunk.len();
                }
            }
        }

        if !stale.is_empty() {
            summary.invalidated = stale.len();
            self.directory.invalidate(&stale).await;
        }

        tracing::info!(
            attempted = summary.attempted,
            delivered = summary.delivered,
            failed = summary.failed,
            invalidated = summary.invalidated,
            title = %message.title,
            "Push delivery finished"
        );

        summary
    }
}
