//! HTTP adapter for inbound payment processor webhooks.

mod handlers;
mod routes;

pub use handlers::{handle_dodo_webhook, health, WebhookAppState};
pub use routes::{app_router, webhook_routes};
