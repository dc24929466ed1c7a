use serde::Deserialize;

use crate::error::AppError;

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection string
    pub database_url: String,

    /// Payment provider API base URL
    pub payment_api_url: String,

    /// Payment provider access token (required — the service refuses to
    /// start without it)
    pub payment_access_token: String,

    /// Push gateway endpoint for batch sends
    pub push_api_url: String,

    /// Optional bearer token for the push gateway
    pub push_access_token: Option<String>,

    /// Maximum addresses per push submission (provider limit, default: 100)
    pub push_batch_size: usize,

    /// Maximum number of PostgreSQL connections in the pool (default: 20)
    pub db_max_connections: u32,

    /// Seconds to wait when acquiring a pool connection (default: 5)
    pub db_acquire_timeout_secs: u64,

    /// HTTP listen port (default: 3000)
    pub api_port: u16,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| {
                AppError::Config("DATABASE_URL environment variable is required".to_string())
            })?,
            payment_api_url: std::env::var("PAYMENT_API_URL")
                .unwrap_or_else(|_| "https://api.mercadopago.com".to_string()),
            payment_access_token: std::env::var("PAYMENT_ACCESS_TOKEN").map_err(|_| {
                AppError::Config(
                    "PAYMENT_ACCESS_TOKEN environment variable is required".to_string(),
                )
            })?,
            push_api_url: std::env::var("PUSH_API_URL")
                .unwrap_or_else(|_| "https://exp.host/--/api/v2/push/send".to_string()),
            push_access_token: std::env::var("PUSH_ACCESS_TOKEN").ok(),
            push_batch_size: std::env::var("PUSH_BATCH_SIZE")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .map_err(|_| AppError::Config("PUSH_BATCH_SIZE must be a valid usize".to_string()))?,
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .map_err(|_| {
                    AppError::Config("DB_MAX_CONNECTIONS must be a valid u32".to_string())
                })?,
            db_acquire_timeout_secs: std::env::var("DB_ACQUIRE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| {
                    AppError::Config("DB_ACQUIRE_TIMEOUT_SECS must be a valid u64".to_string())
                })?,
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| AppError::Config("API_PORT must be a valid u16".to_string()))?,
        })
    }
}
