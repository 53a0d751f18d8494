//! Adapters - Implementations of the ports.
//!
//! - `http` - axum endpoints for inbound webhooks
//! - `memory` - in-process stores used by the binary and tests

pub mod http;
pub mod memory;
