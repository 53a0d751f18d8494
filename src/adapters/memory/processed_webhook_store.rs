//! In-memory webhook idempotency store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::DomainError;
use crate::ports::ProcessedWebhookStore;

/// Record of a processed webhook message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedWebhook {
    pub event_type: String,
    pub processed_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct InMemoryProcessedWebhookStore {
    processed: RwLock<HashMap<String, ProcessedWebhook>>,
}

impl InMemoryProcessedWebhookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, webhook_id: &str) -> Option<ProcessedWebhook> {
        self.processed.read().await.get(webhook_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.processed.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.processed.read().await.is_empty()
    }
}

#[async_trait]
impl ProcessedWebhookStore for InMemoryProcessedWebhookStore {
    async fn contains(&self, webhook_id: &str) -> Result<bool, DomainError> {
        Ok(self.processed.read().await.contains_key(webhook_id))
    }

    async fn mark_processed(&self, webhook_id: &str, event_type: &str) -> Result<(), DomainError> {
        // First write wins; a concurrent duplicate keeps the original record.
        self.processed
            .write()
            .await
            .entry(webhook_id.to_string())
            .or_insert_with(|| ProcessedWebhook {
                event_type: event_type.to_string(),
                processed_at: Utc::now(),
            });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mark_then_contains() {
        let store = InMemoryProcessedWebhookStore::new();
        assert!(!store.contains("msg_1").await.unwrap());

        store.mark_processed("msg_1", "payment.succeeded").await.unwrap();

        assert!(store.contains("msg_1").await.unwrap());
        assert_eq!(store.get("msg_1").await.unwrap().event_type, "payment.succeeded");
    }

    #[tokio::test]
    async fn first_mark_wins() {
        let store = InMemoryProcessedWebhookStore::new();

        store.mark_processed("msg_1", "payment.succeeded").await.unwrap();
        store.mark_processed("msg_1", "payment.failed").await.unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(store.get("msg_1").await.unwrap().event_type, "payment.succeeded");
    }
}
