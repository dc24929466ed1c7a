//! JobSignal API server binary entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use jobsignal_common::config::AppConfig;
use jobsignal_common::db::create_pool;
use jobsignal_notify::directory::AddressDirectory;
use jobsignal_notify::dispatcher::PushDispatcher;
use jobsignal_notify::notifier::Notifier;
use jobsignal_notify::payments::HttpPaymentGateway;
use jobsignal_notify::push::ExpoPushClient;
use jobsignal_notify::reconcile::PaymentReconciler;
use jobsignal_notify::store::{PgJobStore, PgUserStore};

use jobsignal_api::routes::create_router;
use jobsignal_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("jobsignal_api=debug,jobsignal_notify=debug,tower_http=debug")
        }))
        .init();

    tracing::info!("Starting JobSignal API server...");

    // Load configuration; missing credentials abort startup here.
    let config = AppConfig::from_env()?;

    // Create database connection pool
    let pool = create_pool(&config).await?;
    tracing::info!("Database pool created");

    // Wire the notification pipeline
    let http = reqwest::Client::new();
    let push_client = Arc::new(ExpoPushClient::new(
        http.clone(),
        config.push_api_url.clone(),
        config.push_access_token.clone(),
        config.push_batch_size,
    ));
    let gateway = Arc::new(HttpPaymentGateway::new(
        http,
        config.payment_api_url.clone(),
        config.payment_access_token.clone(),
    ));

    let directory = AddressDirectory::new(Arc::new(PgUserStore::new(pool.clone())));
    let dispatcher = PushDispatcher::new(push_client, directory.clone());
    let notifier = Notifier::new(directory, dispatcher);
    let reconciler = PaymentReconciler::new(
        gateway,
        Arc::new(PgJobStore::new(pool.clone())),
        notifier.clone(),
    );

    // Build application state
    let state = AppState::new(reconciler, notifier, config.clone());

    // Build router
    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.api_port));
    tracing::info!("API server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
