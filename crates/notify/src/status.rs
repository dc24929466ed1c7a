//! Job-status transition → notification intents.
//!
//! A pure mapping: each lifecycle status implies one or two
//! notifications, keyed on who needs to hear about it and whose name
//! drives the copy. The match is exhaustive over `JobStatus` so adding
//! a status forces a decision here.

use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use jobsignal_common::types::{JobStatus, NotificationIntent};

/// Job-status trigger sent by the client application after it has
/// updated its own view of the job.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusChange {
    pub job_id: String,
    /// Raw status string; unknown values produce no intents.
    pub new_status: String,
    pub client_id: Uuid,
    pub worker_id: Uuid,
    pub client_name: String,
    pub worker_name: String,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
}

/// Map a status transition to the notifications it implies.
///
/// Unknown statuses return an empty vec, never an error.
pub fn intents_for(change: &StatusChange) -> Vec<NotificationIntent> {
    let Some(status) = JobStatus::parse(&change.new_status) else {
        tracing::debug!(
            job_id = %change.job_id,
            new_status = %change.new_status,
            "Unknown job status, no notifications"
        );
        return Vec::new();
    };

    let payload = json!({
        "job_id": change.job_id,
        "status": status.to_string(),
    });

    match status {
        JobStatus::Accepted => vec![
            NotificationIntent {
                recipient: change.client_id,
                title: "Offer accepted".to_string(),
                body: format!("{} accepted your job", change.worker_name),
                payload: payload.clone(),
            },
            NotificationIntent {
                recipient: change.worker_id,
                title: "Job confirmed".to_string(),
                body: format!("You accepted {}'s job", change.client_name),
                payload,
            },
        ],
        JobStatus::InProgress => vec![NotificationIntent {
            recipient: change.client_id,
            title: "Work started".to_string(),
            body: format!("{} started working on your job", change.worker_name),
            payload,
        }],
        JobStatus::Completed => {
            let body = match change.total_amount {
                Some(amount) => format!(
                    "{} finished the job. Total: ${:.2}",
                    change.worker_name, amount
                ),
                None => format!("{} finished the job", change.worker_name),
            };
            vec![NotificationIntent {
                recipient: change.client_id,
                title: "Job completed".to_string(),
                body,
                payload,
            }]
        }
        JobStatus::Cancelled => {
            let body = match &change.cancellation_reason {
                Some(reason) => format!("{} cancelled the job: {}", change.worker_name, reason),
                None => format!("{} cancelled the job", change.worker_name),
            };
            vec![NotificationIntent {
                recipient: change.client_id,
                title: "Job cancelled".to_string(),
                body,
                payload,
            }]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_change(new_status: &str) -> StatusChange {
        StatusChange {
            job_id: "job-42".to_string(),
            new_status: new_status.to_string(),
            client_id: Uuid::new_v4(),
            worker_id: Uuid::new_v4(),
            client_name: "Alice".to_string(),
            worker_name: "Bob".to_string(),
            total_amount: None,
            cancellation_reason: None,
        }
    }

    #[test]
    fn test_accepted_notifies_both_parties() {
        let change = make_change("accepted");
        let intents = intents_for(&change);

        assert_eq!(intents.len(), 2);
        assert_eq!(intents[0].recipient, change.client_id);
        assert!(intents[0].body.contains("Bob"));
        assert_eq!(intents[1].recipient, change.worker_id);
        assert!(intents[1].body.contains("Alice"));
    }

    #[test]
    fn test_in_progress_notifies_client_only() {
        let change = make_change("in_progress");
        let intents = intents_for(&change);

        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].recipient, change.client_id);
        assert!(intents[0].body.contains("Bob"));
    }

    #[test]
    fn test_completed_with_amount() {
        let mut change = make_change("completed");
        change.total_amount = Some(149.5);
        let intents = intents_for(&change);

        assert_eq!(intents.len(), 1);
        assert!(intents[0].body.contains("$149.50"));
    }

    #[test]
    fn test_completed_without_amount_is_generic() {
        let change = make_change("completed");
        let intents = intents_for(&change);

        assert_eq!(intents.len(), 1);
        assert!(!intents[0].body.contains('$'));
        assert!(intents[0].body.contains("Bob"));
    }

    #[test]
    fn test_cancelled_with_reason() {
        let mut change = make_change("cancelled");
        change.cancellation_reason = Some("schedule conflict".to_string());
        let intents = intents_for(&change);

        assert_eq!(intents.len(), 1);
        assert!(intents[0].body.contains("schedule conflict"));
    }

    #[test]
    fn test_cancelled_without_reason_is_generic() {
        let change = make_change("cancelled");
        let intents = intents_for(&change);

        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].body, "Bob cancelled the job");
    }

    #[test]
    fn test_unknown_status_produces_no_intents() {
        let change = make_change("unknown_value");
        assert!(intents_for(&change).is_empty());
    }

    #[test]
    fn test_payload_carries_job_id() {
        let change = make_change("accepted");
        let intents = intents_for(&change);
        assert_eq!(intents[0].payload["job_id"], "job-42");
        assert_eq!(intents[0].payload["status"], "accepted");
    }
}
