//! SubscriptionGateway port - Writes to the store's subscription records.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OrderId, SubscriptionId};
use crate::domain::order::SubscriptionStatus;

/// Port for mutating store subscriptions.
#[async_trait]
pub trait SubscriptionGateway: Send + Sync {
    /// Returns true if the subscription exists.
    async fn exists(&self, subscription_id: SubscriptionId) -> Result<bool, DomainError>;

    /// Move the subscription to `status`, attaching `note` to its history.
    async fn update_status(
        &self,
        subscription_id: SubscriptionId,
        status: SubscriptionStatus,
        note: &str,
    ) -> Result<(), DomainError>;

    /// Create the renewal order for a billing cycle and return its id.
    ///
    /// `renewal_key` identifies the delivery that triggered the renewal. A
    /// second call with a key already used returns the existing order
    /// instead of creating another one, so a redelivered renewal whose
    /// follow-up writes failed does not bill the cycle twice.
    ///
    /// `payment_id` is the remote payment that settled the renewal, when the
    /// event carries one.
    async fn create_renewal_order(
        &self,
        subscription_id: SubscriptionId,
        renewal_key: &str,
        payment_id: Option<&str>,
    ) -> Result<OrderId, DomainError>;
}
