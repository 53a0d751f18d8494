//! In-memory implementations of the store ports.
//!
//! Stand-ins for the e-commerce platform's order tables and the mapping
//! tables. State lives for the life of the process.

mod mapping_repository;
mod order_gateway;
mod processed_webhook_store;
mod subscription_gateway;

pub use mapping_repository::InMemoryMappingRepository;
pub use order_gateway::{InMemoryOrderGateway, OrderRecord};
pub use processed_webhook_store::{InMemoryProcessedWebhookStore, ProcessedWebhook};
pub use subscription_gateway::{InMemorySubscriptionGateway, SubscriptionRecord};
