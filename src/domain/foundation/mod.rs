//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, the clock abstraction, and error types
//! that form the vocabulary of the gateway domain.

mod clock;
mod errors;
mod ids;

pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{DomainError, ErrorCode};
pub use ids::{OrderId, SubscriptionId};
