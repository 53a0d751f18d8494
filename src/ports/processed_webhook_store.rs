//! ProcessedWebhookStore port - Idempotency for webhook deliveries.
//!
//! The sender retries deliveries and keeps the `webhook-id` stable across
//! retries, so the id is the deduplication key.
//!
//! ## Why Idempotency Matters
//!
//! The same message may arrive more than once due to:
//! - Network timeouts on the sender side
//! - Our acknowledgment being lost
//! - Manual replays from the processor dashboard

use async_trait::async_trait;

use crate::domain::foundation::DomainError;

/// Port for remembering which webhook messages were applied.
#[async_trait]
pub trait ProcessedWebhookStore: Send + Sync {
    /// Check if a message id has been processed.
    async fn contains(&self, webhook_id: &str) -> Result<bool, DomainError>;

    /// Mark a message id as processed.
    ///
    /// Called only after the event was applied (or deliberately ignored), so
    /// a failed attempt can be redelivered.
    async fn mark_processed(&self, webhook_id: &str, event_type: &str) -> Result<(), DomainError>;
}
