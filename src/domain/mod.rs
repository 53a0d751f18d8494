//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, clock, errors)
//! - `order` - Store-side order and subscription statuses
//! - `webhook` - Standard Webhooks verification and event model

pub mod foundation;
pub mod order;
pub mod webhook;
