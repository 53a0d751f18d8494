//! Order domain module.
//!
//! Vocabulary for the store-side order and subscription state that
//! webhook events drive.

mod status;

pub use status::{OrderStatus, SubscriptionStatus};
