use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payment state of a job, as recorded by the job-management system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    None,
    Pending,
    Paid,
    Failed,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::None => write!(f, "none"),
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Paid => write!(f, "paid"),
            PaymentStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Lifecycle status of a job, driven by the client application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

impl JobStatus {
    /// Lenient parse from the wire value. Unknown statuses are not an
    /// error; they simply map to no notifications.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "accepted" => Some(JobStatus::Accepted),
            "in_progress" => Some(JobStatus::InProgress),
            "completed" => Some(JobStatus::Completed),
            "cancelled" => Some(JobStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Accepted => write!(f, "accepted"),
            JobStatus::InProgress => write!(f, "in_progress"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A marketplace job, owned by the external job-management system.
///
/// This service only reads jobs and applies partial payment-field
/// updates; it never creates or deletes them. The id is an opaque string
/// carried verbatim in the payment provider's external reference.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: String,
    pub client_id: Uuid,
    pub worker_id: Uuid,
    pub client_name: String,
    pub payment_status: PaymentStatus,
    pub payment_id: Option<String>,
    pub total_amount: Option<f64>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update applied to a job record. Absent fields are left
/// untouched; the store stamps `updated_at` on every apply.
#[derive(Debug, Clone, Default)]
pub struct JobPatch {
    pub payment_status: Option<PaymentStatus>,
    pub payment_id: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub total_amount: Option<f64>,
}

/// Message handed to the push provider for a batch of addresses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    /// Opaque payload forwarded to the device for deep linking.
    pub data: serde_json::Value,
}

/// A single notification to be resolved and delivered. Ephemeral —
/// produced by the status mapping, consumed by the dispatch chain,
/// never persisted.
#[derive(Debug, Clone)]
pub struct NotificationIntent {
    pub recipient: Uuid,
    pub title: String,
    pub body: String,
    pub payload: serde_json::Value,
}

impl NotificationIntent {
    pub fn message(&self) -> PushMessage {
        PushMessage {
            title: self.title.clone(),
            body: self.body.clone(),
            data: self.payload.clone(),
        }
    }
}

/// Per-address error reported by the push provider for one ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushError {
    /// The device registration no longer exists; the stored address is
    /// permanently dead and must be cleared.
    DeviceNotRegistered,
    MessageTooBig,
    MessageRateExceeded,
    InvalidCredentials,
    Other(String),
}

impl PushError {
    /// Map a provider ticket error code onto the taxonomy.
    pub fn from_code(code: &str, message: &str) -> Self {
        match code {
            "DeviceNotRegistered" => PushError::DeviceNotRegistered,
            "MessageTooBig" => PushError::MessageTooBig,
            "MessageRateExceeded" => PushError::MessageRateExceeded,
            "InvalidCredentials" => PushError::InvalidCredentials,
            _ => PushError::Other(format!("{code}: {message}")),
        }
    }
}

impl std::fmt::Display for PushError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PushError::DeviceNotRegistered => write!(f, "DeviceNotRegistered"),
            PushError::MessageTooBig => write!(f, "MessageTooBig"),
            PushError::MessageRateExceeded => write!(f, "MessageRateExceeded"),
            PushError::InvalidCredentials => write!(f, "InvalidCredentials"),
            PushError::Other(detail) => write!(f, "{detail}"),
        }
    }
}

/// Result for one address in a submitted push batch. Drives the
/// invalidation decision; not persisted beyond the current call.
#[derive(Debug, Clone)]
pub struct DeliveryOutcome {
    pub address: String,
    pub error: Option<PushError>,
}

impl DeliveryOutcome {
    pub fn ok(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            error: None,
        }
    }

    pub fn failed(address: impl Into<String>, error: PushError) -> Self {
        Self {
            address: address.into(),
            error: Some(error),
        }
    }
}
