//! In-memory order store.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, OrderId};
use crate::domain::order::OrderStatus;
use crate::ports::OrderGateway;

/// Snapshot of an order held by [`InMemoryOrderGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub status: OrderStatus,
    pub payment_id: Option<String>,
    pub notes: Vec<String>,
    pub stock_restored: u32,
}

impl OrderRecord {
    fn new(status: OrderStatus) -> Self {
        Self {
            status,
            payment_id: None,
            notes: Vec::new(),
            stock_restored: 0,
        }
    }
}

/// `OrderGateway` that keeps orders in a map. Used by the binary and tests.
#[derive(Default)]
pub struct InMemoryOrderGateway {
    orders: RwLock<HashMap<OrderId, OrderRecord>>,
}

impl InMemoryOrderGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway pre-populated with orders in the given statuses.
    pub fn with_orders(orders: impl IntoIterator<Item = (OrderId, OrderStatus)>) -> Self {
        let orders = orders
            .into_iter()
            .map(|(id, status)| (id, OrderRecord::new(status)))
            .collect();
        Self {
            orders: RwLock::new(orders),
        }
    }

    pub async fn insert(&self, order_id: OrderId, status: OrderStatus) {
        self.orders
            .write()
            .await
            .insert(order_id, OrderRecord::new(status));
    }

    pub async fn get(&self, order_id: OrderId) -> Option<OrderRecord> {
        self.orders.read().await.get(&order_id).cloned()
    }

    async fn with_order<F>(&self, order_id: OrderId, apply: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut OrderRecord) + Send,
    {
        let mut orders = self.orders.write().await;
        let record = orders.get_mut(&order_id).ok_or_else(|| {
            DomainError::new(ErrorCode::OrderNotFound, format!("Order {} not found", order_id))
        })?;
        apply(record);
        Ok(())
    }
}

#[async_trait]
impl OrderGateway for InMemoryOrderGateway {
    async fn exists(&self, order_id: OrderId) -> Result<bool, DomainError> {
        Ok(self.orders.read().await.contains_key(&order_id))
    }

    async fn record_payment(&self, order_id: OrderId, payment_id: &str) -> Result<(), DomainError> {
        let payment_id = payment_id.to_string();
        self.with_order(order_id, move |order| order.payment_id = Some(payment_id))
            .await
    }

    async fn update_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
        note: &str,
    ) -> Result<(), DomainError> {
        let note = note.to_string();
        self.with_order(order_id, move |order| {
            order.status = status;
            order.notes.push(note);
        })
        .await
    }

    async fn add_note(&self, order_id: OrderId, note: &str) -> Result<(), DomainError> {
        let note = note.to_string();
        self.with_order(order_id, move |order| order.notes.push(note))
            .await
    }

    async fn restore_stock(&self, order_id: OrderId) -> Result<(), DomainError> {
        self.with_order(order_id, |order| order.stock_restored += 1)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn update_status_records_note() {
        let gateway = InMemoryOrderGateway::with_orders([(OrderId::new(1), OrderStatus::Pending)]);

        gateway
            .update_status(OrderId::new(1), OrderStatus::Completed, "paid")
            .await
            .unwrap();

        let order = gateway.get(OrderId::new(1)).await.unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.notes, vec!["paid".to_string()]);
    }

    #[tokio::test]
    async fn record_payment_and_restore_stock() {
        let gateway = InMemoryOrderGateway::new();
        gateway.insert(OrderId::new(2), OrderStatus::Pending).await;

        gateway.record_payment(OrderId::new(2), "pay_2").await.unwrap();
        gateway.restore_stock(OrderId::new(2)).await.unwrap();

        let order = gateway.get(OrderId::new(2)).await.unwrap();
        assert_eq!(order.payment_id.as_deref(), Some("pay_2"));
        assert_eq!(order.stock_restored, 1);
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let gateway = InMemoryOrderGateway::new();

        assert!(!gateway.exists(OrderId::new(9)).await.unwrap());
        let err = gateway.add_note(OrderId::new(9), "x").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderNotFound);
    }
}
