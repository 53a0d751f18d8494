//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Store Ports
//!
//! - `OrderGateway` - Order status, notes, stock
//! - `SubscriptionGateway` - Subscription status and renewal orders
//! - `MappingRepository` - Local id ↔ remote id tables
//!
//! ## Webhook Ports
//!
//! - `ProcessedWebhookStore` - Delivery idempotency keyed on `webhook-id`

mod mapping_repository;
mod order_gateway;
mod processed_webhook_store;
mod subscription_gateway;

pub use mapping_repository::{MappingKind, MappingRepository};
pub use order_gateway::OrderGateway;
pub use processed_webhook_store::ProcessedWebhookStore;
pub use subscription_gateway::SubscriptionGateway;
