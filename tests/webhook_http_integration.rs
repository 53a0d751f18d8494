//! Integration tests for the Dodo Payments webhook endpoint.
//!
//! These tests drive the full router with signed requests:
//! 1. Signature verification against the real wall clock
//! 2. Event dispatch into the in-memory order and subscription stores
//! 3. The always-200 acknowledgement policy
//! 4. Deduplication on `webhook-id`

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use base64::prelude::{Engine as _, BASE64_STANDARD};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use dodo_gateway::adapters::http::{app_router, WebhookAppState};
use dodo_gateway::adapters::memory::{
    InMemoryMappingRepository, InMemoryOrderGateway, InMemoryProcessedWebhookStore,
    InMemorySubscriptionGateway,
};
use dodo_gateway::application::HandleWebhookHandler;
use dodo_gateway::domain::foundation::{OrderId, SubscriptionId};
use dodo_gateway::domain::order::{OrderStatus, SubscriptionStatus};
use dodo_gateway::domain::webhook::StandardWebhook;
use dodo_gateway::ports::{MappingKind, MappingRepository};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    router: Router,
    signer: StandardWebhook,
    mappings: Arc<InMemoryMappingRepository>,
    orders: Arc<InMemoryOrderGateway>,
    subscriptions: Arc<InMemorySubscriptionGateway>,
    processed: Arc<InMemoryProcessedWebhookStore>,
}

fn signing_key() -> String {
    format!("whsec_{}", BASE64_STANDARD.encode([0u8; 32]))
}

async fn test_app() -> TestApp {
    let mappings = Arc::new(InMemoryMappingRepository::new());
    mappings.save(MappingKind::Payment, 42, "pay_123").await.unwrap();
    mappings
        .save(MappingKind::Subscription, 7, "sub_abc")
        .await
        .unwrap();

    let orders = Arc::new(InMemoryOrderGateway::with_orders([(
        OrderId::new(42),
        OrderStatus::Pending,
    )]));
    let subscriptions = Arc::new(InMemorySubscriptionGateway::new(1000));
    subscriptions
        .insert(SubscriptionId::new(7), SubscriptionStatus::Pending)
        .await;
    let processed = Arc::new(InMemoryProcessedWebhookStore::new());

    let handler = HandleWebhookHandler::new(
        Arc::new(StandardWebhook::new(&signing_key()).unwrap()),
        mappings.clone(),
        orders.clone(),
        subscriptions.clone(),
        processed.clone(),
    );

    TestApp {
        router: app_router().with_state(WebhookAppState::new(Arc::new(handler))),
        signer: StandardWebhook::new(&signing_key()).unwrap(),
        mappings,
        orders,
        subscriptions,
        processed,
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

impl TestApp {
    fn signed_request(&self, msg_id: &str, timestamp: i64, body: &str) -> Request<Body> {
        let signature = self
            .signer
            .sign(msg_id, timestamp, body.as_bytes())
            .unwrap();
        Request::builder()
            .method("POST")
            .uri("/webhooks/dodo-payments")
            .header("content-type", "application/json")
            .header("webhook-id", msg_id)
            .header("webhook-timestamp", timestamp.to_string())
            .header("webhook-signature", signature)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(&self, request: Request<Body>) -> StatusCode {
        self.router
            .clone()
            .oneshot(request)
            .await
            .unwrap()
            .status()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn signed_payment_succeeded_completes_order() {
    let app = test_app().await;
    let body = r#"{"type":"payment.succeeded","data":{"payment_id":"pay_123"}}"#;

    let status = app.send(app.signed_request("msg_1", now(), body)).await;

    assert_eq!(status, StatusCode::OK);
    let order = app.orders.get(OrderId::new(42)).await.unwrap();
    assert_eq!(order.status, OrderStatus::Completed);
    assert_eq!(order.payment_id.as_deref(), Some("pay_123"));
    assert!(app.processed.get("msg_1").await.is_some());
}

#[tokio::test]
async fn tampered_body_is_acknowledged_but_not_applied() {
    let app = test_app().await;
    let signed = r#"{"type":"payment.succeeded","data":{"payment_id":"pay_123"}}"#;
    let mut request = app.signed_request("msg_1", now(), signed);
    *request.body_mut() =
        Body::from(r#"{"type":"payment.cancelled","data":{"payment_id":"pay_123"}}"#);

    let status = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    let order = app.orders.get(OrderId::new(42)).await.unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(app.processed.is_empty().await);
}

#[tokio::test]
async fn stale_timestamp_is_acknowledged_but_not_applied() {
    let app = test_app().await;
    let body = r#"{"type":"payment.succeeded","data":{"payment_id":"pay_123"}}"#;

    let status = app.send(app.signed_request("msg_1", now() - 400, body)).await;

    assert_eq!(status, StatusCode::OK);
    let order = app.orders.get(OrderId::new(42)).await.unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
}

#[tokio::test]
async fn missing_headers_are_acknowledged() {
    let app = test_app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/webhooks/dodo-payments")
        .body(Body::from(r#"{"type":"payment.succeeded"}"#))
        .unwrap();

    let status = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(app.processed.is_empty().await);
}

#[tokio::test]
async fn unmapped_payment_is_acknowledged_and_left_retryable() {
    let app = test_app().await;
    let body = r#"{"type":"payment.succeeded","data":{"payment_id":"pay_unknown"}}"#;

    let status = app.send(app.signed_request("msg_1", now(), body)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(app.processed.get("msg_1").await.is_none());
}

#[tokio::test]
async fn retryable_failure_applies_when_resent() {
    let app = test_app().await;
    let body = r#"{"type":"payment.succeeded","data":{"payment_id":"pay_late"}}"#;
    let timestamp = now();

    let first = app.send(app.signed_request("msg_late", timestamp, body)).await;
    assert_eq!(first, StatusCode::OK);
    assert!(app.processed.get("msg_late").await.is_none());

    app.mappings
        .save(MappingKind::Payment, 42, "pay_late")
        .await
        .unwrap();
    let resent = app.send(app.signed_request("msg_late", timestamp, body)).await;

    assert_eq!(resent, StatusCode::OK);
    let order = app.orders.get(OrderId::new(42)).await.unwrap();
    assert_eq!(order.status, OrderStatus::Completed);
    assert!(app.processed.get("msg_late").await.is_some());
}

#[tokio::test]
async fn duplicate_delivery_is_applied_once() {
    let app = test_app().await;
    let body = r#"{"type":"refund.failed","data":{"payment_id":"pay_123","refund_id":"ref_1"}}"#;
    let timestamp = now();

    app.send(app.signed_request("msg_dup", timestamp, body)).await;
    app.send(app.signed_request("msg_dup", timestamp, body)).await;

    let order = app.orders.get(OrderId::new(42)).await.unwrap();
    assert_eq!(order.notes.len(), 1);
    assert_eq!(app.processed.len().await, 1);
}

#[tokio::test]
async fn subscription_renewal_creates_order() {
    let app = test_app().await;
    let body = json!({
        "type": "subscription.renewed",
        "data": { "subscription_id": "sub_abc", "payment_id": "pay_renew_1" }
    })
    .to_string();

    let status = app.send(app.signed_request("msg_r", now(), &body)).await;

    assert_eq!(status, StatusCode::OK);
    let subscription = app.subscriptions.get(SubscriptionId::new(7)).await.unwrap();
    assert_eq!(subscription.status, SubscriptionStatus::Active);
    assert_eq!(
        subscription.renewals,
        vec![(OrderId::new(1000), Some("pay_renew_1".to_string()))]
    );
}

#[tokio::test]
async fn signature_list_with_foreign_versions_still_verifies() {
    let app = test_app().await;
    let body = r#"{"type":"license_key.created","data":{}}"#;
    let timestamp = now();
    let valid = app.signer.sign("msg_multi", timestamp, body.as_bytes()).unwrap();
    let request = Request::builder()
        .method("POST")
        .uri("/webhooks/dodo-payments")
        .header("webhook-id", "msg_multi")
        .header("webhook-timestamp", timestamp.to_string())
        .header(
            "webhook-signature",
            format!("v1a,ignored v1,AAAA {}", valid),
        )
        .body(Body::from(body))
        .unwrap();

    let status = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        app.processed.get("msg_multi").await.unwrap().event_type,
        "license_key.created"
    );
}

#[tokio::test]
async fn health_endpoint_responds() {
    let app = test_app().await;
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    assert_eq!(app.send(request).await, StatusCode::OK);
}
