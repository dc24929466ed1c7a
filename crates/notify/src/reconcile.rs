//! Payment reconciliation — drives job payment state from provider
//! webhook events.
//!
//! The transport layer has already acknowledged the event by the time
//! this runs, so nothing here may fail loudly: every provider, store,
//! or delivery failure is logged and swallowed at `process`. Duplicate
//! and reordered deliveries are expected; an already-reconciled payment
//! is skipped rather than re-notified.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use jobsignal_common::error::AppError;
use jobsignal_common::types::{Job, JobPatch, NotificationIntent, PaymentStatus};

use crate::notifier::Notifier;
use crate::payments::{PaymentGateway, ProviderPaymentStatus};
use crate::store::JobStore;

/// Inbound provider callback. Deliberately lenient: only `type` and
/// `data.id` are consulted, and anything missing turns the event into
/// an ignored no-op rather than a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub data: Option<WebhookData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookData {
    #[serde(default)]
    pub id: Option<String>,
}

impl WebhookEvent {
    /// The payment id, when this is a payment event carrying one.
    pub fn payment_id(&self) -> Option<&str> {
        if self.kind.as_deref() != Some("payment") {
            return None;
        }
        self.data.as_ref()?.id.as_deref()
    }
}

/// Terminal outcome of reconciling one webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Not a payment event, or no payment id to act on.
    Ignored,
    /// The payment carries no job reference, or the job is unknown.
    Unlinked,
    /// Payment status needs no action (pending, in mediation, ...).
    Unhandled,
    /// This payment was already applied to the job.
    Duplicate,
    Approved { job_id: String },
    Rejected { job_id: String },
}

/// Reconciles webhook events against the authoritative payment record
/// and the job store, then fans out the implied notifications.
#[derive(Clone)]
pub struct PaymentReconciler {
    gateway: Arc<dyn PaymentGateway>,
    jobs: Arc<dyn JobStore>,
    notifier: Notifier,
}

impl PaymentReconciler {
    pub fn new(gateway: Arc<dyn PaymentGateway>, jobs: Arc<dyn JobStore>, notifier: Notifier) -> Self {
        Self {
            gateway,
            jobs,
            notifier,
        }
    }

    /// Fire-and-forget entry point for the webhook's spawned
    /// continuation. Never returns an error; the transport outcome was
    /// fixed before this ran.
    pub async fn process(&self, event: WebhookEvent) {
        match self.reconcile(&event).await {
            Ok(outcome) => {
                tracing::info!(?outcome, "Webhook event reconciled");
            }
            Err(e) => {
                tracing::error!(error = %e, ?event, "Webhook reconciliation failed");
            }
        }
    }

    /// Reconcile one event. Separated from `process` so tests can
    /// observe the outcome.
    pub async fn reconcile(&self, event: &WebhookEvent) -> Result<ReconcileOutcome, AppError> {
        let Some(payment_id) = event.payment_id() else {
            tracing::debug!(kind = ?event.kind, "Ignoring non-payment webhook event");
            return Ok(ReconcileOutcome::Ignored);
        };

        // The callback body is untrusted; fetch the authoritative record.
        let payment = self.gateway.fetch_payment(payment_id).await?;

        let Some(job_id) = payment.external_reference.clone() else {
            tracing::warn!(payment_id, "Payment has no job reference, cannot reconcile");
            return Ok(ReconcileOutcome::Unlinked);
        };

        let Some(job) = self.jobs.get(&job_id).await? else {
            tracing::warn!(payment_id, job_id, "Payment references unknown job");
            return Ok(ReconcileOutcome::Unlinked);
        };

        match payment.status {
            ProviderPaymentStatus::Approved => {
                if job.payment_status == PaymentStatus::Paid
                    && job.payment_id.as_deref() == Some(payment.id.as_str())
                {
                    tracing::info!(payment_id, job_id, "Payment already reconciled, skipping");
                    return Ok(ReconcileOutcome::Duplicate);
                }

                self.jobs
                    .apply(
                        &job_id,
                        &JobPatch {
                            payment_status: Some(PaymentStatus::Paid),
                            payment_id: Some(payment.id.clone()),
                            paid_at: Some(Utc::now()),
                            total_amount: payment.transaction_amount,
                        },
                    )
                    .await?;

                self.notifier
                    .notify_user(&payment_received_intent(&job, payment.transaction_amount))
                    .await;

                Ok(ReconcileOutcome::Approved { job_id })
            }
            ProviderPaymentStatus::Rejected => {
                // Payment status only moves forward. A rejected callback
                // arriving after the job was paid (replayed or reordered
                // delivery) must not regress it.
                if job.payment_status == PaymentStatus::Paid {
                    tracing::warn!(
                        payment_id,
                        job_id,
                        "Rejected callback for already-paid job, ignoring"
                    );
                    return Ok(ReconcileOutcome::Unhandled);
                }
                if job.payment_status == PaymentStatus::Failed
                    && job.payment_id.as_deref() == Some(payment.id.as_str())
                {
                    tracing::info!(payment_id, job_id, "Payment rejection already recorded, skipping");
                    return Ok(ReconcileOutcome::Duplicate);
                }

                self.jobs
                    .apply(
                        &job_id,
                        &JobPatch {
                            payment_status: Some(PaymentStatus::Failed),
                            payment_id: Some(payment.id.clone()),
                            ..JobPatch::default()
                        },
                    )
                    .await?;

                self.notifier
                    .notify_user(&payment_rejected_intent(&job))
                    .await;

                Ok(ReconcileOutcome::Rejected { job_id })
            }
            ProviderPaymentStatus::Pending | ProviderPaymentStatus::Other => {
                tracing::debug!(payment_id, job_id, status = ?payment.status, "Payment status needs no action");
                Ok(ReconcileOutcome::Unhandled)
            }
        }
    }
}

/// "Payment received" notification for the job's worker.
fn payment_received_intent(job: &Job, amount: Option<f64>) -> NotificationIntent {
    let body = match amount {
        Some(amount) => format!(
            "{} paid ${:.2} for the job. You can get started!",
            job.client_name, amount
        ),
        None => format!("{} completed the payment. You can get started!", job.client_name),
    };

    NotificationIntent {
        recipient: job.worker_id,
        title: "Payment received".to_string(),
        body,
        payload: json!({ "job_id": job.id, "event": "payment_approved" }),
    }
}

/// "Payment rejected" notification for the job's client.
fn payment_rejected_intent(job: &Job) -> NotificationIntent {
    NotificationIntent {
        recipient: job.client_id,
        title: "Payment rejected".to_string(),
        body: "Your payment was rejected. Please try another payment method.".to_string(),
        payload: json!({ "job_id": job.id, "event": "payment_rejected" }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_id_requires_payment_type() {
        let event: WebhookEvent = serde_json::from_str(
            r#"{"type": "merchant_order", "action": "created", "data": {"id": "123"}}"#,
        )
        .unwrap();
        assert_eq!(event.payment_id(), None);
    }

    #[test]
    fn test_payment_id_present() {
        let event: WebhookEvent = serde_json::from_str(
            r#"{"type": "payment", "action": "payment.updated", "data": {"id": "pay_7"}}"#,
        )
        .unwrap();
        assert_eq!(event.payment_id(), Some("pay_7"));
    }

    #[test]
    fn test_malformed_event_still_deserializes() {
        let event: WebhookEvent = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(event.payment_id(), None);
    }
}
