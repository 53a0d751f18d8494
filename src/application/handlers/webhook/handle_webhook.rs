//! HandleWebhookHandler - Command handler for Dodo Payments webhook deliveries.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::foundation::{OrderId, SubscriptionId};
use crate::domain::order::{OrderStatus, SubscriptionStatus};
use crate::domain::webhook::{
    EventCategory, StandardWebhook, WebhookError, WebhookEvent, WebhookEventType, WebhookHeaders,
};
use crate::ports::{
    MappingKind, MappingRepository, OrderGateway, ProcessedWebhookStore, SubscriptionGateway,
};

/// Command to handle one webhook delivery.
#[derive(Debug, Clone)]
pub struct HandleWebhookCommand {
    /// Raw request body, byte-for-byte as received.
    pub payload: Vec<u8>,
    /// Request headers keyed by lowercase name.
    pub headers: HashMap<String, String>,
}

/// Result of webhook processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleWebhookResult {
    /// Order moved to a new status.
    OrderUpdated {
        order_id: OrderId,
        status: OrderStatus,
    },
    /// Note appended to an order, status unchanged.
    OrderNoteAdded { order_id: OrderId },
    /// Subscription moved to a new status.
    SubscriptionUpdated {
        subscription_id: SubscriptionId,
        status: SubscriptionStatus,
    },
    /// Renewal order created and subscription reactivated.
    RenewalOrderCreated {
        subscription_id: SubscriptionId,
        order_id: OrderId,
    },
    /// The `webhook-id` was applied by an earlier delivery.
    AlreadyProcessed,
    /// Event verified but not acted on.
    Ignored(String),
}

/// Handler for processing Dodo Payments webhooks.
///
/// Verifies the delivery, deduplicates it on `webhook-id`, then applies
/// payment, refund and subscription events to the store. The id is only
/// recorded once the event was applied, so failures stay redeliverable.
pub struct HandleWebhookHandler {
    verifier: Arc<StandardWebhook>,
    mappings: Arc<dyn MappingRepository>,
    orders: Arc<dyn OrderGateway>,
    subscriptions: Arc<dyn SubscriptionGateway>,
    processed: Arc<dyn ProcessedWebhookStore>,
}

impl HandleWebhookHandler {
    pub fn new(
        verifier: Arc<StandardWebhook>,
        mappings: Arc<dyn MappingRepository>,
        orders: Arc<dyn OrderGateway>,
        subscriptions: Arc<dyn SubscriptionGateway>,
        processed: Arc<dyn ProcessedWebhookStore>,
    ) -> Self {
        Self {
            verifier,
            mappings,
            orders,
            subscriptions,
            processed,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandleWebhookCommand,
    ) -> Result<HandleWebhookResult, WebhookError> {
        // 1. Verify headers, timestamp and signature
        let headers = WebhookHeaders::from_map(&cmd.headers)?;
        let body = self.verifier.verify_headers(&cmd.payload, &headers)?;

        // 2. Idempotency
        if self.processed.contains(&headers.id).await? {
            debug!(webhook_id = %headers.id, "Webhook already processed");
            return Ok(HandleWebhookResult::AlreadyProcessed);
        }

        // 3. Dispatch
        let event = WebhookEvent::from_value(body)?;
        info!(
            webhook_id = %headers.id,
            event_type = event.event_type.as_str(),
            "Processing webhook event"
        );

        let result = match event.category() {
            EventCategory::Payment => self.handle_payment(&event).await?,
            EventCategory::Refund => self.handle_refund(&event).await?,
            EventCategory::Subscription => {
                self.handle_subscription(&event, &headers.id).await?
            }
            EventCategory::Dispute | EventCategory::LicenseKey | EventCategory::Unknown => {
                HandleWebhookResult::Ignored(format!(
                    "No action for {}",
                    event.event_type.as_str()
                ))
            }
        };

        // 4. Remember the delivery
        self.processed
            .mark_processed(&headers.id, event.event_type.as_str())
            .await?;

        Ok(result)
    }

    async fn handle_payment(
        &self,
        event: &WebhookEvent,
    ) -> Result<HandleWebhookResult, WebhookError> {
        let payment_id = event.require_str("payment_id")?;
        let order_id = self.resolve_order(payment_id).await?;

        let (status, note) = match event.event_type {
            WebhookEventType::PaymentSucceeded => {
                self.orders.record_payment(order_id, payment_id).await?;
                (OrderStatus::Completed, "Payment completed by Dodo Payments")
            }
            WebhookEventType::PaymentFailed => (OrderStatus::Failed, "Payment failed by Dodo Payments"),
            WebhookEventType::PaymentCancelled => {
                (OrderStatus::Cancelled, "Payment cancelled by Dodo Payments")
            }
            _ => (OrderStatus::Processing, "Payment processing by Dodo Payments"),
        };

        self.orders.update_status(order_id, status, note).await?;
        if status.releases_stock() {
            self.orders.restore_stock(order_id).await?;
        }

        Ok(HandleWebhookResult::OrderUpdated { order_id, status })
    }

    async fn handle_refund(
        &self,
        event: &WebhookEvent,
    ) -> Result<HandleWebhookResult, WebhookError> {
        let payment_id = event.require_str("payment_id")?;
        let refund_id = event.refund_id().unwrap_or("unknown");
        let order_id = self.resolve_order(payment_id).await?;

        match event.event_type {
            WebhookEventType::RefundSucceeded => {
                self.orders
                    .update_status(
                        order_id,
                        OrderStatus::Refunded,
                        "Payment refunded by Dodo Payments",
                    )
                    .await?;
                self.orders
                    .add_note(
                        order_id,
                        &format!(
                            "Refunded payment in Dodo Payments. Payment ID: {}, Refund ID: {}",
                            payment_id, refund_id
                        ),
                    )
                    .await?;
                Ok(HandleWebhookResult::OrderUpdated {
                    order_id,
                    status: OrderStatus::Refunded,
                })
            }
            _ => {
                self.orders
                    .add_note(
                        order_id,
                        &format!(
                            "Refund failed in Dodo Payments. Payment ID: {}, Refund ID: {}",
                            payment_id, refund_id
                        ),
                    )
                    .await?;
                Ok(HandleWebhookResult::OrderNoteAdded { order_id })
            }
        }
    }

    /// `webhook_id` keys the renewal order, so a redelivered renewal reuses
    /// the order an earlier partial attempt created.
    async fn handle_subscription(
        &self,
        event: &WebhookEvent,
        webhook_id: &str,
    ) -> Result<HandleWebhookResult, WebhookError> {
        let remote_id = event.require_str("subscription_id")?;
        let subscription_id = self.resolve_subscription(remote_id).await?;

        if event.event_type == WebhookEventType::SubscriptionRenewed {
            let order_id = self
                .subscriptions
                .create_renewal_order(subscription_id, webhook_id, event.payment_id())
                .await?;
            if let Some(payment_id) = event.payment_id() {
                self.mappings
                    .save(MappingKind::Payment, order_id.as_u64(), payment_id)
                    .await?;
            }
            self.subscriptions
                .update_status(
                    subscription_id,
                    SubscriptionStatus::Active,
                    "Subscription renewed by Dodo Payments",
                )
                .await?;
            return Ok(HandleWebhookResult::RenewalOrderCreated {
                subscription_id,
                order_id,
            });
        }

        let (status, note) = match event.event_type {
            WebhookEventType::SubscriptionActive => {
                (SubscriptionStatus::Active, "Subscription activated by Dodo Payments")
            }
            WebhookEventType::SubscriptionOnHold => {
                (SubscriptionStatus::OnHold, "Subscription put on hold by Dodo Payments")
            }
            WebhookEventType::SubscriptionPaused => {
                (SubscriptionStatus::OnHold, "Subscription paused by Dodo Payments")
            }
            WebhookEventType::SubscriptionFailed => {
                (SubscriptionStatus::OnHold, "Subscription payment failed in Dodo Payments")
            }
            WebhookEventType::SubscriptionCancelled => {
                (SubscriptionStatus::Cancelled, "Subscription cancelled by Dodo Payments")
            }
            _ => (SubscriptionStatus::Expired, "Subscription expired in Dodo Payments"),
        };

        self.subscriptions
            .update_status(subscription_id, status, note)
            .await?;

        Ok(HandleWebhookResult::SubscriptionUpdated {
            subscription_id,
            status,
        })
    }

    async fn resolve_order(&self, payment_id: &str) -> Result<OrderId, WebhookError> {
        let order_id = self
            .mappings
            .find_local_id(MappingKind::Payment, payment_id)
            .await?
            .map(OrderId::new)
            .ok_or_else(|| WebhookError::OrderNotFound(payment_id.to_string()))?;

        if !self.orders.exists(order_id).await? {
            return Err(WebhookError::OrderNotFound(payment_id.to_string()));
        }
        Ok(order_id)
    }

    async fn resolve_subscription(&self, remote_id: &str) -> Result<SubscriptionId, WebhookError> {
        let subscription_id = self
            .mappings
            .find_local_id(MappingKind::Subscription, remote_id)
            .await?
            .map(SubscriptionId::new)
            .ok_or_else(|| WebhookError::SubscriptionNotFound(remote_id.to_string()))?;

        if !self.subscriptions.exists(subscription_id).await? {
            return Err(WebhookError::SubscriptionNotFound(remote_id.to_string()));
        }
        Ok(subscription_id)
    }
}
