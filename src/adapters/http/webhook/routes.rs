//! Axum router configuration for webhook endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{handle_dodo_webhook, health, WebhookAppState};

/// Create the webhook router.
///
/// Webhooks carry no user authentication; they are verified via signature.
///
/// # Routes
/// - `POST /dodo-payments` - Handle Dodo Payments webhooks
pub fn webhook_routes() -> Router<WebhookAppState> {
    Router::new().route("/dodo-payments", post(handle_dodo_webhook))
}

/// Create the complete application router.
///
/// # Routes
/// - `POST /webhooks/dodo-payments`
/// - `GET /health`
pub fn app_router() -> Router<WebhookAppState> {
    Router::new()
        .nest("/webhooks", webhook_routes())
        .route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::memory::{
        InMemoryMappingRepository, InMemoryOrderGateway, InMemoryProcessedWebhookStore,
        InMemorySubscriptionGateway,
    };
    use crate::application::handlers::webhook::HandleWebhookHandler;
    use crate::domain::webhook::StandardWebhook;

    fn test_state() -> WebhookAppState {
        let handler = HandleWebhookHandler::new(
            Arc::new(StandardWebhook::from_raw(vec![1u8; 32])),
            Arc::new(InMemoryMappingRepository::new()),
            Arc::new(InMemoryOrderGateway::new()),
            Arc::new(InMemorySubscriptionGateway::default()),
            Arc::new(InMemoryProcessedWebhookStore::new()),
        );
        WebhookAppState::new(Arc::new(handler))
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let app = app_router().with_state(test_state());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unsigned_webhook_is_still_acknowledged() {
        let app = app_router().with_state(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhooks/dodo-payments")
                    .body(Body::from(r#"{"type":"payment.succeeded"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn webhook_route_rejects_get() {
        let app = app_router().with_state(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/webhooks/dodo-payments")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
