//! Payment provider contract and HTTP client.
//!
//! Webhook bodies are not authenticated beyond transport and can be
//! replayed or reordered, so nothing in them is trusted except the
//! payment id. Everything else is re-fetched from the provider here.

use async_trait::async_trait;
use serde::Deserialize;

use jobsignal_common::error::AppError;

/// Provider-side status of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderPaymentStatus {
    Approved,
    Rejected,
    Pending,
    #[serde(other)]
    Other,
}

/// Authoritative payment record fetched by id.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRecord {
    pub id: String,
    pub status: ProviderPaymentStatus,
    /// The job id this payment was created for. Absent means the
    /// payment cannot be reconciled.
    #[serde(default)]
    pub external_reference: Option<String>,
    #[serde(default)]
    pub transaction_amount: Option<f64>,
}

/// Read access to the payment provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn fetch_payment(&self, payment_id: &str) -> Result<PaymentRecord, AppError>;
}

/// REST client for the payment provider's payments endpoint.
pub struct HttpPaymentGateway {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl HttpPaymentGateway {
    pub fn new(http: reqwest::Client, base_url: String, access_token: String) -> Self {
        Self {
            http,
            base_url,
            access_token,
        }
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn fetch_payment(&self, payment_id: &str) -> Result<PaymentRecord, AppError> {
        let url = format!("{}/v1/payments/{}", self.base_url, payment_id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| AppError::PaymentProvider(format!("Payment lookup failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::PaymentProvider(format!(
                "Payment lookup for {payment_id} returned {status}"
            )));
        }

        let record: PaymentRecord = response
            .json()
            .await
            .map_err(|e| AppError::PaymentProvider(format!("Invalid payment record: {e}")))?;

        Ok(record)
    }
}
