//! Dodo Gateway - Payment webhook receiver for Dodo Payments
//!
//! Verifies Standard Webhooks deliveries (HMAC-SHA256 over
//! `{id}.{timestamp}.{body}`) and applies payment, refund and subscription
//! events to store orders.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
