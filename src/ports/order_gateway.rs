//! OrderGateway port - Writes to the store's order state machine.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OrderId};
use crate::domain::order::OrderStatus;

/// Port for mutating store orders.
///
/// Implementations own status transition rules; the gateway only requests
/// the target status.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Returns true if the order exists.
    async fn exists(&self, order_id: OrderId) -> Result<bool, DomainError>;

    /// Record that the order was paid with the given remote payment.
    async fn record_payment(&self, order_id: OrderId, payment_id: &str) -> Result<(), DomainError>;

    /// Move the order to `status`, attaching `note` to the order history.
    async fn update_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
        note: &str,
    ) -> Result<(), DomainError>;

    /// Append a note to the order history without changing status.
    async fn add_note(&self, order_id: OrderId, note: &str) -> Result<(), DomainError>;

    /// Return the order's reserved stock to inventory.
    async fn restore_stock(&self, order_id: OrderId) -> Result<(), DomainError>;
}
