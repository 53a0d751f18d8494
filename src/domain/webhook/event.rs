//! Dodo Payments webhook event types.
//!
//! A verified delivery is a JSON document of the shape
//! `{"type": "<category>.<status>", "data": {...}}`. Only the fields the
//! gateway acts on are read; everything else stays in `data`.

use serde_json::Value;

use super::errors::WebhookError;

/// Top-level grouping of event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    Payment,
    Refund,
    Dispute,
    Subscription,
    LicenseKey,
    Unknown,
}

/// Known webhook event types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WebhookEventType {
    PaymentSucceeded,
    PaymentFailed,
    PaymentProcessing,
    PaymentCancelled,
    RefundSucceeded,
    RefundFailed,
    DisputeOpened,
    DisputeExpired,
    DisputeAccepted,
    DisputeCancelled,
    DisputeChallenged,
    DisputeWon,
    DisputeLost,
    SubscriptionActive,
    SubscriptionRenewed,
    SubscriptionOnHold,
    SubscriptionPaused,
    SubscriptionCancelled,
    SubscriptionFailed,
    SubscriptionExpired,
    LicenseKeyCreated,
    /// Any type string not listed above, kept verbatim.
    Unknown(String),
}

impl WebhookEventType {
    /// Parse event type from its wire string.
    pub fn parse(s: &str) -> Self {
        match s {
            "payment.succeeded" => Self::PaymentSucceeded,
            "payment.failed" => Self::PaymentFailed,
            "payment.processing" => Self::PaymentProcessing,
            "payment.cancelled" => Self::PaymentCancelled,
            "refund.succeeded" => Self::RefundSucceeded,
            "refund.failed" => Self::RefundFailed,
            "dispute.opened" => Self::DisputeOpened,
            "dispute.expired" => Self::DisputeExpired,
            "dispute.accepted" => Self::DisputeAccepted,
            "dispute.cancelled" => Self::DisputeCancelled,
            "dispute.challenged" => Self::DisputeChallenged,
            "dispute.won" => Self::DisputeWon,
            "dispute.lost" => Self::DisputeLost,
            "subscription.active" => Self::SubscriptionActive,
            "subscription.renewed" => Self::SubscriptionRenewed,
            "subscription.on_hold" => Self::SubscriptionOnHold,
            "subscription.paused" => Self::SubscriptionPaused,
            "subscription.cancelled" => Self::SubscriptionCancelled,
            "subscription.failed" => Self::SubscriptionFailed,
            "subscription.expired" => Self::SubscriptionExpired,
            "license_key.created" => Self::LicenseKeyCreated,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Convert back to the wire string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::PaymentSucceeded => "payment.succeeded",
            Self::PaymentFailed => "payment.failed",
            Self::PaymentProcessing => "payment.processing",
            Self::PaymentCancelled => "payment.cancelled",
            Self::RefundSucceeded => "refund.succeeded",
            Self::RefundFailed => "refund.failed",
            Self::DisputeOpened => "dispute.opened",
            Self::DisputeExpired => "dispute.expired",
            Self::DisputeAccepted => "dispute.accepted",
            Self::DisputeCancelled => "dispute.cancelled",
            Self::DisputeChallenged => "dispute.challenged",
            Self::DisputeWon => "dispute.won",
            Self::DisputeLost => "dispute.lost",
            Self::SubscriptionActive => "subscription.active",
            Self::SubscriptionRenewed => "subscription.renewed",
            Self::SubscriptionOnHold => "subscription.on_hold",
            Self::SubscriptionPaused => "subscription.paused",
            Self::SubscriptionCancelled => "subscription.cancelled",
            Self::SubscriptionFailed => "subscription.failed",
            Self::SubscriptionExpired => "subscription.expired",
            Self::LicenseKeyCreated => "license_key.created",
            Self::Unknown(raw) => raw.as_str(),
        }
    }

    pub fn category(&self) -> EventCategory {
        match self {
            Self::PaymentSucceeded
            | Self::PaymentFailed
            | Self::PaymentProcessing
            | Self::PaymentCancelled => EventCategory::Payment,
            Self::RefundSucceeded | Self::RefundFailed => EventCategory::Refund,
            Self::DisputeOpened
            | Self::DisputeExpired
            | Self::DisputeAccepted
            | Self::DisputeCancelled
            | Self::DisputeChallenged
            | Self::DisputeWon
            | Self::DisputeLost => EventCategory::Dispute,
            Self::SubscriptionActive
            | Self::SubscriptionRenewed
            | Self::SubscriptionOnHold
            | Self::SubscriptionPaused
            | Self::SubscriptionCancelled
            | Self::SubscriptionFailed
            | Self::SubscriptionExpired => EventCategory::Subscription,
            Self::LicenseKeyCreated => EventCategory::LicenseKey,
            Self::Unknown(_) => EventCategory::Unknown,
        }
    }
}

/// A verified webhook event.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEvent {
    pub event_type: WebhookEventType,
    /// Event-specific payload; `{}` when the sender omitted it.
    pub data: Value,
}

impl WebhookEvent {
    /// Builds an event from the JSON returned by the verifier.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::UnsupportedPayload` if `type` is absent or not a string.
    pub fn from_value(value: Value) -> Result<Self, WebhookError> {
        let Value::Object(mut fields) = value else {
            return Err(WebhookError::UnsupportedPayload);
        };

        let event_type = match fields.get("type") {
            Some(Value::String(raw)) => WebhookEventType::parse(raw),
            _ => return Err(WebhookError::UnsupportedPayload),
        };
        let data = fields
            .remove("data")
            .unwrap_or_else(|| Value::Object(Default::default()));

        Ok(Self { event_type, data })
    }

    pub fn category(&self) -> EventCategory {
        self.event_type.category()
    }

    pub fn payment_id(&self) -> Option<&str> {
        self.data_str("payment_id")
    }

    pub fn refund_id(&self) -> Option<&str> {
        self.data_str("refund_id")
    }

    pub fn subscription_id(&self) -> Option<&str> {
        self.data_str("subscription_id")
    }

    /// Reads a string field from `data`, failing with `MissingField` if absent.
    pub fn require_str(&self, field: &'static str) -> Result<&str, WebhookError> {
        self.data_str(field).ok_or(WebhookError::MissingField(field))
    }

    fn data_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(Value::as_str)
    }
}
