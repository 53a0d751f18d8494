//! Webhook error types.
//!
//! Covers both rejection of an inbound delivery (headers, timestamp,
//! signature) and failures while applying a verified event to the store.

use thiserror::Error;

use crate::domain::foundation::DomainError;

/// Errors that occur during webhook verification and processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// One or more of `webhook-id`, `webhook-timestamp`, `webhook-signature` is absent.
    #[error("Missing required headers")]
    MissingHeaders,

    /// Timestamp header is not an unsigned base-10 integer.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Timestamp is more than the tolerance behind the verifier's clock.
    #[error("Message timestamp too old")]
    TimestampTooOld,

    /// Timestamp is more than the tolerance ahead of the verifier's clock.
    #[error("Message timestamp too new")]
    TimestampTooNew,

    /// No `v1` signature candidate matched.
    #[error("No matching signature found")]
    SignatureMismatch,

    /// Signing secret is not valid base64 after prefix stripping.
    #[error("Invalid webhook secret")]
    InvalidSecret,

    /// Signature matched but the body is not a JSON document.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Verified JSON does not carry a string `type` field.
    #[error("Unsupported payload shape")]
    UnsupportedPayload,

    /// Required field missing from the event's `data` object.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// No local order is mapped to the remote payment.
    #[error("No order found for payment {0}")]
    OrderNotFound(String),

    /// No local subscription is mapped to the remote subscription.
    #[error("No subscription found for {0}")]
    SubscriptionNotFound(String),

    /// A collaborator (store, mapping table) failed.
    #[error("Database error: {0}")]
    Database(String),
}

impl WebhookError {
    /// Returns true if the delivery was rejected before any business logic ran.
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            WebhookError::MissingHeaders
                | WebhookError::InvalidTimestamp
                | WebhookError::TimestampTooOld
                | WebhookError::TimestampTooNew
                | WebhookError::SignatureMismatch
                | WebhookError::InvalidSecret
        )
    }

    /// Returns true if the same delivery could succeed on a later attempt.
    ///
    /// Missing mappings count as retryable: the checkout that creates the
    /// mapping may still be in flight when the first event arrives.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WebhookError::Database(_)
                | WebhookError::OrderNotFound(_)
                | WebhookError::SubscriptionNotFound(_)
        )
    }
}

impl From<DomainError> for WebhookError {
    fn from(err: DomainError) -> Self {
        WebhookError::Database(err.to_string())
    }
}
