//! Narrow store contracts the pipeline depends on, plus their Postgres
//! implementations.
//!
//! Jobs are owned by the external job-management system; this service
//! only reads them and applies partial payment-field updates. Users are
//! read for their push address and updated only to clear a stale one.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use jobsignal_common::error::AppError;
use jobsignal_common::types::{Job, JobPatch};

/// Read/merge-update access to job records.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn get(&self, job_id: &str) -> Result<Option<Job>, AppError>;

    /// Merge `patch` into the job record. Atomic per call: a concurrent
    /// reader sees either none or all of the patch's fields.
    async fn apply(&self, job_id: &str, patch: &JobPatch) -> Result<(), AppError>;
}

/// Push-address access to user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Current push address registered for a user, if any.
    async fn push_address(&self, user_id: Uuid) -> Result<Option<String>, AppError>;

    /// Clear `address` from every user record holding it. Returns the
    /// number of records cleared; zero when nobody holds it.
    async fn clear_push_address(&self, address: &str) -> Result<u64, AppError>;
}

/// Postgres-backed job store.
#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn get(&self, job_id: &str) -> Result<Option<Job>, AppError> {
        let job: Option<Job> = sqlx::query_as("SELECT * FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(job)
    }

    async fn apply(&self, job_id: &str, patch: &JobPatch) -> Result<(), AppError> {
        // Single-statement merge keeps the update atomic per call.
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET payment_status = COALESCE($2, payment_status),
                payment_id = COALESCE($3, payment_id),
                paid_at = COALESCE($4, paid_at),
                total_amount = COALESCE($5, total_amount),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(job_id)
        .bind(patch.payment_status)
        .bind(&patch.payment_id)
        .bind(patch.paid_at)
        .bind(patch.total_amount)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Job {} not found", job_id)));
        }

        tracing::debug!(job_id, "Job patch applied");
        Ok(())
    }
}

/// Postgres-backed user store.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn push_address(&self, user_id: Uuid) -> Result<Option<String>, AppError> {
        let token: Option<(Option<String>,)> =
            sqlx::query_as("SELECT push_token FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(token.and_then(|(t,)| t))
    }

    async fn clear_push_address(&self, address: &str) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE users SET push_token = NULL, updated_at = now() WHERE push_token = $1",
        )
        .bind(address)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
