//! In-memory subscription store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, OrderId, SubscriptionId};
use crate::domain::order::SubscriptionStatus;
use crate::ports::SubscriptionGateway;

/// Snapshot of a subscription held by [`InMemorySubscriptionGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionRecord {
    pub status: SubscriptionStatus,
    pub notes: Vec<String>,
    /// Renewal orders in creation order, with the settling payment if known.
    pub renewals: Vec<(OrderId, Option<String>)>,
}

#[derive(Default)]
struct State {
    subscriptions: HashMap<SubscriptionId, SubscriptionRecord>,
    renewals_by_key: HashMap<String, OrderId>,
}

/// `SubscriptionGateway` that keeps subscriptions in a map.
///
/// Renewal orders get sequential ids starting at `first_order_id`.
pub struct InMemorySubscriptionGateway {
    state: RwLock<State>,
    next_order_id: AtomicU64,
}

impl InMemorySubscriptionGateway {
    pub fn new(first_order_id: u64) -> Self {
        Self {
            state: RwLock::new(State::default()),
            next_order_id: AtomicU64::new(first_order_id),
        }
    }

    pub async fn insert(&self, subscription_id: SubscriptionId, status: SubscriptionStatus) {
        self.state.write().await.subscriptions.insert(
            subscription_id,
            SubscriptionRecord {
                status,
                notes: Vec::new(),
                renewals: Vec::new(),
            },
        );
    }

    pub async fn get(&self, subscription_id: SubscriptionId) -> Option<SubscriptionRecord> {
        self.state.read().await.subscriptions.get(&subscription_id).cloned()
    }

    fn not_found(subscription_id: SubscriptionId) -> DomainError {
        DomainError::new(
            ErrorCode::SubscriptionNotFound,
            format!("Subscription {} not found", subscription_id),
        )
    }
}

impl Default for InMemorySubscriptionGateway {
    fn default() -> Self {
        Self::new(1)
    }
}

#[async_trait]
impl SubscriptionGateway for InMemorySubscriptionGateway {
    async fn exists(&self, subscription_id: SubscriptionId) -> Result<bool, DomainError> {
        Ok(self.state.read().await.subscriptions.contains_key(&subscription_id))
    }

    async fn update_status(
        &self,
        subscription_id: SubscriptionId,
        status: SubscriptionStatus,
        note: &str,
    ) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let record = state
            .subscriptions
            .get_mut(&subscription_id)
            .ok_or_else(|| Self::not_found(subscription_id))?;
        record.status = status;
        record.notes.push(note.to_string());
        Ok(())
    }

    async fn create_renewal_order(
        &self,
        subscription_id: SubscriptionId,
        renewal_key: &str,
        payment_id: Option<&str>,
    ) -> Result<OrderId, DomainError> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.renewals_by_key.get(renewal_key) {
            return Ok(*existing);
        }
        let record = state
            .subscriptions
            .get_mut(&subscription_id)
            .ok_or_else(|| Self::not_found(subscription_id))?;
        let order_id = OrderId::new(self.next_order_id.fetch_add(1, Ordering::SeqCst));
        record
            .renewals
            .push((order_id, payment_id.map(str::to_string)));
        state
            .renewals_by_key
            .insert(renewal_key.to_string(), order_id);
        Ok(order_id)
    }
}
