//! Webhook domain module.
//!
//! Authenticates Standard Webhooks deliveries from Dodo Payments and models
//! the events they carry.
//!
//! # Module Structure
//!
//! - `verifier` - `StandardWebhook` signing and verification
//! - `headers` - `webhook-*` header extraction and parsing
//! - `event` - Typed view of a verified event
//! - `errors` - Rejection and processing errors

mod errors;
mod event;
mod headers;
mod verifier;

pub use errors::WebhookError;
pub use event::{EventCategory, WebhookEvent, WebhookEventType};
pub use headers::{
    parse_timestamp, VersionedSignature, WebhookHeaders, HEADER_WEBHOOK_ID,
    HEADER_WEBHOOK_SIGNATURE, HEADER_WEBHOOK_TIMESTAMP,
};
pub use verifier::{StandardWebhook, SECRET_PREFIX, SIGNATURE_VERSION, TIMESTAMP_TOLERANCE_SECS};
