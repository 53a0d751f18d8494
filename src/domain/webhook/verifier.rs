//! Standard Webhooks signature verification.
//!
//! Authenticates deliveries from Dodo Payments. The sender signs
//! `{webhook-id}.{webhook-timestamp}.{body}` with HMAC-SHA256 and sends
//! `v1,<base64 mac>` entries in the `webhook-signature` header.
//!
//! # Verification Steps
//!
//! 1. All three `webhook-*` headers must be present
//! 2. Timestamp must be within five minutes of the local clock, either way
//! 3. Recompute the `v1` signature over the literal header values and body
//! 4. Compare against each `v1` entry in constant time
//! 5. Decode the body as JSON

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretVec};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::WebhookError;
use super::headers::{parse_timestamp, WebhookHeaders};
use crate::domain::foundation::{Clock, SystemClock};

type HmacSha256 = Hmac<Sha256>;

/// Prefix on secrets issued by the dashboard.
pub const SECRET_PREFIX: &str = "whsec_";

/// Allowed distance between the message timestamp and now (5 minutes).
pub const TIMESTAMP_TOLERANCE_SECS: i64 = 5 * 60;

/// The only signature version this verifier produces or accepts.
pub const SIGNATURE_VERSION: &str = "v1";

/// Verifier for Standard Webhooks signatures.
///
/// Immutable after construction; share one instance behind an `Arc` across
/// concurrent deliveries.
pub struct StandardWebhook {
    secret: SecretVec<u8>,
    clock: Arc<dyn Clock>,
}

impl StandardWebhook {
    /// Creates a verifier from a dashboard secret.
    ///
    /// A leading `whsec_` is stripped and the rest decoded as standard base64.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::InvalidSecret` if the remainder is not valid
    /// base64 or decodes to an empty key. An empty HMAC key is public, so
    /// accepting it would let anyone sign deliveries.
    pub fn new(secret: &str) -> Result<Self, WebhookError> {
        let encoded = secret.strip_prefix(SECRET_PREFIX).unwrap_or(secret);
        let raw = BASE64_STANDARD
            .decode(encoded)
            .map_err(|_| WebhookError::InvalidSecret)?;
        if raw.is_empty() {
            return Err(WebhookError::InvalidSecret);
        }
        Ok(Self::from_raw(raw))
    }

    /// Creates a verifier from raw key bytes, without prefix stripping or decoding.
    pub fn from_raw(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: SecretVec::new(secret.into()),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the wall clock used for timestamp tolerance checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Verifies a delivery and returns its decoded JSON body.
    ///
    /// `payload` must be the body exactly as received. `headers` is keyed by
    /// lowercase header name.
    ///
    /// # Errors
    ///
    /// - `MissingHeaders` - A `webhook-*` header is absent
    /// - `InvalidTimestamp` - Timestamp is not a positive integer
    /// - `TimestampTooOld` / `TimestampTooNew` - Outside the tolerance window
    /// - `SignatureMismatch` - No `v1` entry matched
    /// - `InvalidPayload` - Signature matched but the body is not JSON
    pub fn verify(
        &self,
        payload: &[u8],
        headers: &HashMap<String, String>,
    ) -> Result<serde_json::Value, WebhookError> {
        let headers = WebhookHeaders::from_map(headers)?;
        self.verify_headers(payload, &headers)
    }

    /// Same as [`verify`](Self::verify) for headers that were already extracted.
    pub fn verify_headers(
        &self,
        payload: &[u8],
        headers: &WebhookHeaders,
    ) -> Result<serde_json::Value, WebhookError> {
        self.check_timestamp(&headers.timestamp)?;

        let expected = self.compute_signature(&headers.id, &headers.timestamp, payload)?;

        let matched = headers
            .signatures()
            .filter(|candidate| candidate.version == SIGNATURE_VERSION)
            .any(|candidate| constant_time_eq(expected.as_bytes(), candidate.value.as_bytes()));

        if !matched {
            return Err(WebhookError::SignatureMismatch);
        }

        serde_json::from_slice(payload).map_err(|e| WebhookError::InvalidPayload(e.to_string()))
    }

    /// Produces the `webhook-signature` entry for a message.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::InvalidTimestamp` unless `timestamp` is positive.
    pub fn sign(&self, msg_id: &str, timestamp: i64, payload: &[u8]) -> Result<String, WebhookError> {
        if timestamp <= 0 {
            return Err(WebhookError::InvalidTimestamp);
        }
        let signature = self.compute_signature(msg_id, &timestamp.to_string(), payload)?;
        Ok(format!("{},{}", SIGNATURE_VERSION, signature))
    }

    fn check_timestamp(&self, raw: &str) -> Result<(), WebhookError> {
        let timestamp = parse_timestamp(raw)?;
        let now = self.clock.now_unix();

        if timestamp < now.saturating_sub(TIMESTAMP_TOLERANCE_SECS) {
            return Err(WebhookError::TimestampTooOld);
        }
        if timestamp > now.saturating_add(TIMESTAMP_TOLERANCE_SECS) {
            return Err(WebhookError::TimestampTooNew);
        }
        Ok(())
    }

    /// Base64 HMAC-SHA256 over `{msg_id}.{timestamp}.{payload}`.
    ///
    /// Senders describe the encoding as "hex digest, packed back to bytes,
    /// then base64". Packing the hex digest yields the raw MAC, so the raw
    /// MAC is encoded directly.
    fn compute_signature(
        &self,
        msg_id: &str,
        timestamp: &str,
        payload: &[u8],
    ) -> Result<String, WebhookError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret())
            .map_err(|_| WebhookError::InvalidSecret)?;
        mac.update(msg_id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload);
        Ok(BASE64_STANDARD.encode(mac.finalize().into_bytes()))
    }
}

impl fmt::Debug for StandardWebhook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StandardWebhook")
            .field("secret", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Performs constant-time comparison of two byte slices.
///
/// Length is not secret; only the content comparison is constant-time.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
