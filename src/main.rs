//! Dodo Gateway server binary.

use std::sync::Arc;

use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dodo_gateway::adapters::http::{app_router, WebhookAppState};
use dodo_gateway::adapters::memory::{
    InMemoryMappingRepository, InMemoryOrderGateway, InMemoryProcessedWebhookStore,
    InMemorySubscriptionGateway,
};
use dodo_gateway::application::HandleWebhookHandler;
use dodo_gateway::config::AppConfig;
use dodo_gateway::domain::webhook::StandardWebhook;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        error!(error = %err, "Gateway exited with error");
        eprintln!("dodo-gateway: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let verifier = StandardWebhook::new(config.payment.active_webhook_key())?;
    info!(test_mode = config.payment.test_mode, "Webhook verifier ready");

    let handler = HandleWebhookHandler::new(
        Arc::new(verifier),
        Arc::new(InMemoryMappingRepository::new()),
        Arc::new(InMemoryOrderGateway::new()),
        Arc::new(InMemorySubscriptionGateway::default()),
        Arc::new(InMemoryProcessedWebhookStore::new()),
    );

    let app = app_router()
        .with_state(WebhookAppState::new(Arc::new(handler)))
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server starting on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
