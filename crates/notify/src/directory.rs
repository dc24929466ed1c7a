//! Address directory — resolves a user identity to its live push
//! address and clears addresses the provider has declared dead.

use std::sync::Arc;

use uuid::Uuid;

use crate::store::UserStore;

/// Resolves user identities to push addresses and invalidates stale ones.
#[derive(Clone)]
pub struct AddressDirectory {
    users: Arc<dyn UserStore>,
}

impl AddressDirectory {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Current push address for a user. Unknown user, no registered
    /// address, and lookup failure all fold into `None`; the failure
    /// case is logged, never surfaced.
    pub async fn resolve(&self, user_id: Uuid) -> Option<String> {
        match self.users.push_address(user_id).await {
            Ok(Some(address)) => Some(address),
            Ok(None) => {
                tracing::debug!(user_id = %user_id, "No push address registered");
                None
            }
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Push address lookup failed");
                None
            }
        }
    }

    /// Clear each address from every user record holding it.
    ///
    /// Best-effort: one address's failure is logged and does not abort
    /// the rest. Addresses already cleared are a silent no-op.
    pub async fn invalidate(&self, addresses: &[String]) {
        for address in addresses {
            match self.users.clear_push_address(address).await {
                Ok(cleared) => {
                    tracing::info!(address, cleared, "Invalidated stale push address");
                }
                Err(e) => {
                    tracing::error!(address, error = %e, "Failed to invalidate push address");
                }
            }
        }
    }
}
