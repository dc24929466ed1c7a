//! Push provider contract and the Expo-compatible HTTP client.
//!
//! The provider accepts a batch of addresses per submission and returns
//! one ticket per address in submission order. Ticket errors carry a
//! code; `DeviceNotRegistered` means the address is permanently dead.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use jobsignal_common::error::AppError;
use jobsignal_common::types::{DeliveryOutcome, PushError, PushMessage};

/// Delivery provider for push messages.
#[async_trait]
pub trait PushProvider: Send + Sync {
    /// Maximum addresses accepted per submission.
    fn max_batch_size(&self) -> usize;

    /// Provider-side address format check.
    fn is_valid_address(&self, address: &str) -> bool;

    /// Submit one chunk. On success returns one outcome per address, in
    /// the order submitted. An `Err` means the whole chunk failed to
    /// submit (transport or provider outage).
    async fn send_batch(
        &self,
        addresses: &[String],
        message: &PushMessage,
    ) -> Result<Vec<DeliveryOutcome>, AppError>;
}

/// Expo push gateway client.
pub struct ExpoPushClient {
    http: reqwest::Client,
    endpoint: String,
    access_token: Option<String>,
    batch_size: usize,
}

#[derive(Debug, Deserialize)]
struct TicketResponse {
    data: Vec<Ticket>,
}

#[derive(Debug, Deserialize)]
struct Ticket {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<TicketDetails>,
}

#[derive(Debug, Deserialize)]
struct TicketDetails {
    #[serde(default)]
    error: Option<String>,
}

impl ExpoPushClient {
    pub fn new(
        http: reqwest::Client,
        endpoint: String,
        access_token: Option<String>,
        batch_size: usize,
    ) -> Self {
        Self {
            http,
            endpoint,
            access_token,
            batch_size,
        }
    }

    fn classify(address: &str, ticket: &Ticket) -> DeliveryOutcome {
        if ticket.status == "ok" {
            return DeliveryOutcome::ok(address);
        }
        let code = ticket
            .details
            .as_ref()
            .and_then(|d| d.error.as_deref())
            .unwrap_or("UnknownError");
        let message = ticket.message.as_deref().unwrap_or("");
        DeliveryOutcome::failed(address, PushError::from_code(code, message))
    }
}

#[async_trait]
impl PushProvider for ExpoPushClient {
    fn max_batch_size(&self) -> usize {
        self.batch_size
    }

    fn is_valid_address(&self, address: &str) -> bool {
        (address.starts_with("ExponentPushToken[") || address.starts_with("ExpoPushToken["))
            && address.ends_with(']')
    }

    async fn send_batch(
        &self,
        addresses: &[String],
        message: &PushMessage,
    ) -> Result<Vec<DeliveryOutcome>, AppError> {
        let body = json!({
            "to": addresses,
            "title": message.title,
            "body": message.body,
            "data": message.data,
            "sound": "default",
        });

        let mut request = self.http.post(&self.endpoint).json(&body);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::PushProvider(format!("Push submission failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::PushProvider(format!(
                "Push gateway returned {status}"
            )));
        }

        let tickets: TicketResponse = response
            .json()
            .await
            .map_err(|e| AppError::PushProvider(format!("Invalid ticket response: {e}")))?;

        if tickets.data.len() != addresses.len() {
            return Err(AppError::PushProvider(format!(
                "Ticket count mismatch: {} tickets for {} addresses",
                tickets.data.len(),
                addresses.len()
            )));
        }

        // Tickets come back in submission order.
        Ok(addresses
            .iter()
            .zip(tickets.data.iter())
            .map(|(address, ticket)| Self::classify(address, ticket))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ExpoPushClient {
        ExpoPushClient::new(
            reqwest::Client::new(),
            "https://exp.host/--/api/v2/push/send".to_string(),
            None,
            100,
        )
    }

    #[test]
    fn test_valid_token_formats() {
        let c = client();
        assert!(c.is_valid_address("ExponentPushToken[abc123]"));
        assert!(c.is_valid_address("ExpoPushToken[xyz]"));
    }

    #[test]
    fn test_invalid_token_formats() {
        let c = client();
        assert!(!c.is_valid_address(""));
        assert!(!c.is_valid_address("abc123"));
        assert!(!c.is_valid_address("ExponentPushToken[unterminated"));
        assert!(!c.is_valid_address("fcm:some-legacy-token"));
    }

    #[test]
    fn test_classify_ok_ticket() {
        let ticket = Ticket {
            status: "ok".to_string(),
            message: None,
            details: None,
        };
        let outcome = ExpoPushClient::classify("ExponentPushToken[a]", &ticket);
        assert!(outcome.error.is_none());
    }

    #[test]
    fn test_classify_device_not_registered() {
        let ticket = Ticket {
            status: "error".to_string(),
            message: Some("device gone".to_string()),
            details: Some(TicketDetails {
                error: Some("DeviceNotRegistered".to_string()),
            }),
        };
        let outcome = ExpoPushClient::classify("ExponentPushToken[a]", &ticket);
        assert_eq!(outcome.error, Some(PushError::DeviceNotRegistered));
    }

    #[test]
    fn test_classify_unknown_error_code() {
        let ticket = Ticket {
            status: "error".to_string(),
            message: Some("something odd".to_string()),
            details: Some(TicketDetails {
                error: Some("SomeNewCode".to_string()),
            }),
        };
        let outcome = ExpoPushClient::classify("ExponentPushToken[a]", &ticket);
        match outcome.error {
            Some(PushError::Other(detail)) => assert!(detail.contains("SomeNewCode")),
            other => panic!("expected Other, got {:?}", other),
        }
    }
}
