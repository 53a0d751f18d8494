//! HTTP handlers for the Dodo Payments webhook endpoint.
//!
//! The endpoint always answers `200 OK`, whatever the outcome.
//!
//! Verification failures are final. Retryable failures (store errors and
//! mappings not yet written) leave the `webhook-id` unmarked, so the same
//! delivery applies cleanly when it is resent from the Dodo Payments
//! dashboard. They are still acknowledged so the sender does not keep
//! hammering the store while it is unhealthy.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::application::handlers::webhook::{
    HandleWebhookCommand, HandleWebhookHandler, HandleWebhookResult,
};
use crate::domain::webhook::{
    WebhookError, HEADER_WEBHOOK_ID, HEADER_WEBHOOK_SIGNATURE, HEADER_WEBHOOK_TIMESTAMP,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for webhook handlers.
#[derive(Clone)]
pub struct WebhookAppState {
    pub webhook_handler: Arc<HandleWebhookHandler>,
}

impl WebhookAppState {
    pub fn new(webhook_handler: Arc<HandleWebhookHandler>) -> Self {
        Self { webhook_handler }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /webhooks/dodo-payments - Receive a Dodo Payments webhook
pub async fn handle_dodo_webhook(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let cmd = HandleWebhookCommand {
        payload: body.to_vec(),
        headers: webhook_headers(&headers),
    };
    let webhook_id = cmd.headers.get(HEADER_WEBHOOK_ID).cloned().unwrap_or_default();

    match state.webhook_handler.handle(cmd).await {
        Ok(HandleWebhookResult::AlreadyProcessed) => {
            info!(%webhook_id, "Duplicate webhook delivery acknowledged");
        }
        Ok(HandleWebhookResult::Ignored(reason)) => {
            info!(%webhook_id, %reason, "Webhook event ignored");
        }
        Ok(result) => {
            info!(%webhook_id, ?result, "Webhook event applied");
        }
        Err(err) => log_failure(&webhook_id, &err),
    }

    StatusCode::OK
}

/// GET /health - Liveness check
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// Copies the three `webhook-*` headers into a map. Absent or non-UTF-8
/// headers are left out so the presence check rejects the delivery.
fn webhook_headers(headers: &HeaderMap) -> HashMap<String, String> {
    [HEADER_WEBHOOK_ID, HEADER_WEBHOOK_TIMESTAMP, HEADER_WEBHOOK_SIGNATURE]
        .into_iter()
        .filter_map(|name| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(|value| (name.to_string(), value.to_string()))
        })
        .collect()
}

fn log_failure(webhook_id: &str, err: &WebhookError) {
    if err.is_verification_failure() {
        warn!(%webhook_id, error = %err, "Could not verify webhook event");
    } else if matches!(err, WebhookError::Database(_)) {
        error!(%webhook_id, error = %err, "Failed to apply webhook event");
    } else if err.is_retryable() {
        warn!(%webhook_id, error = %err, "Webhook target not found, awaiting redelivery");
    } else {
        warn!(%webhook_id, error = %err, "Webhook event not applied");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn webhook_headers_keeps_only_present_webhook_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("webhook-id", HeaderValue::from_static("msg_1"));
        headers.insert("webhook-signature", HeaderValue::from_static("v1,abc"));
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let map = webhook_headers(&headers);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("webhook-id").map(String::as_str), Some("msg_1"));
        assert!(!map.contains_key("webhook-timestamp"));
    }

    #[test]
    fn webhook_headers_matches_names_case_insensitively() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::HeaderName::from_static("webhook-timestamp"),
            HeaderValue::from_static("1614265330"),
        );

        let map = webhook_headers(&headers);

        assert_eq!(map.get("webhook-timestamp").map(String::as_str), Some("1614265330"));
    }
}
