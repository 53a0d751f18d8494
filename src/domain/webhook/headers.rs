//! Standard Webhooks request headers.

use std::collections::HashMap;

use super::errors::WebhookError;

/// Header carrying the sender-assigned message id.
pub const HEADER_WEBHOOK_ID: &str = "webhook-id";

/// Header carrying the send time in Unix seconds.
pub const HEADER_WEBHOOK_TIMESTAMP: &str = "webhook-timestamp";

/// Header carrying space-separated `{version},{signature}` entries.
pub const HEADER_WEBHOOK_SIGNATURE: &str = "webhook-signature";

/// The three headers a delivery must carry, as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookHeaders {
    pub id: String,
    pub timestamp: String,
    pub signature: String,
}

impl WebhookHeaders {
    pub fn new(
        id: impl Into<String>,
        timestamp: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp: timestamp.into(),
            signature: signature.into(),
        }
    }

    /// Extracts the required headers from a lowercase-keyed map.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::MissingHeaders` if any of the three keys is absent.
    pub fn from_map(headers: &HashMap<String, String>) -> Result<Self, WebhookError> {
        match (
            headers.get(HEADER_WEBHOOK_ID),
            headers.get(HEADER_WEBHOOK_TIMESTAMP),
            headers.get(HEADER_WEBHOOK_SIGNATURE),
        ) {
            (Some(id), Some(timestamp), Some(signature)) => {
                Ok(Self::new(id.as_str(), timestamp.as_str(), signature.as_str()))
            }
            _ => Err(WebhookError::MissingHeaders),
        }
    }

    /// Iterates over the signature entries as `(version, value)` pairs.
    ///
    /// Entries without a comma are skipped. Only the first comma splits, so
    /// values may themselves contain commas.
    pub fn signatures(&self) -> impl Iterator<Item = VersionedSignature<'_>> {
        self.signature
            .split(' ')
            .filter_map(|entry| entry.split_once(','))
            .map(|(version, value)| VersionedSignature { version, value })
    }
}

/// A single entry of the `webhook-signature` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionedSignature<'a> {
    pub version: &'a str,
    pub value: &'a str,
}

/// Parses a timestamp header strictly.
///
/// Accepts only a non-empty run of ASCII digits denoting a positive `i64`.
/// Signs, whitespace, and trailing garbage are rejected instead of being
/// truncated.
pub fn parse_timestamp(raw: &str) -> Result<i64, WebhookError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(WebhookError::InvalidTimestamp);
    }
    match raw.parse::<i64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(WebhookError::InvalidTimestamp),
    }
}
