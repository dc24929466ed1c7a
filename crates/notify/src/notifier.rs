//! Notifier — the resolve-and-deliver chain shared by every trigger.

use jobsignal_common::types::NotificationIntent;

use crate::directory::AddressDirectory;
use crate::dispatcher::PushDispatcher;
use crate::status::{self, StatusChange};

/// Resolves notification recipients and hands the message to the
/// dispatcher. A recipient with no registered address is a no-op,
/// never a failure.
#[derive(Clone)]
pub struct Notifier {
    directory: AddressDirectory,
    dispatcher: PushDispatcher,
}

impl Notifier {
    pub fn new(directory: AddressDirectory, dispatcher: PushDispatcher) -> Self {
        Self {
            directory,
            dispatcher,
        }
    }

    /// Deliver a single intent to its recipient's current address.
    pub async fn notify_user(&self, intent: &NotificationIntent) {
        let Some(address) = self.directory.resolve(intent.recipient).await else {
            tracing::info!(
                recipient = %intent.recipient,
                title = %intent.title,
                "Recipient has no push address, skipping notification"
            );
            return;
        };

        self.dispatcher
            .deliver(vec![address], &intent.message())
            .await;
    }

    /// Fan out every notification a job-status transition implies.
    pub async fn notify_status_change(&self, change: &StatusChange) {
        for intent in status::intents_for(change) {
            self.notify_user(&intent).await;
        }
    }
}
