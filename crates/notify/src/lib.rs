//! Notification pipeline for the JobSignal marketplace.
//!
//! Payment and job-status events flow through here:
//! 1. `reconcile` — webhook events are matched against the authoritative
//!    payment record and drive the job's payment fields
//! 2. `status` — job lifecycle transitions map to notification intents
//! 3. `directory` + `dispatcher` — intents resolve to push addresses and
//!    go out in provider-sized batches, with stale-address cleanup

pub mod directory;
pub mod dispatcher;
pub mod notifier;
pub mod payments;
pub mod push;
pub mod reconcile;
pub mod status;
pub mod store;
