//! Payment configuration

use serde::Deserialize;
use std::fmt;

use super::error::ValidationError;
use crate::domain::webhook::StandardWebhook;

/// Payment configuration (Dodo Payments)
///
/// Both webhook keys may be configured at once; `test_mode` picks which one
/// verifies deliveries.
#[derive(Clone, Default, Deserialize)]
pub struct PaymentConfig {
    /// Use the test-mode signing key
    #[serde(default)]
    pub test_mode: bool,

    /// Live-mode webhook signing key (`whsec_...`)
    #[serde(default)]
    pub live_webhook_key: String,

    /// Test-mode webhook signing key (`whsec_...`)
    #[serde(default)]
    pub test_webhook_key: String,
}

impl PaymentConfig {
    /// The signing key for the current mode.
    pub fn active_webhook_key(&self) -> &str {
        if self.test_mode {
            &self.test_webhook_key
        } else {
            &self.live_webhook_key
        }
    }

    fn active_key_name(&self) -> &'static str {
        if self.test_mode {
            "PAYMENT__TEST_WEBHOOK_KEY"
        } else {
            "PAYMENT__LIVE_WEBHOOK_KEY"
        }
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let key = self.active_webhook_key();
        if key.trim().is_empty() {
            return Err(ValidationError::MissingRequired(self.active_key_name()));
        }
        if StandardWebhook::new(key).is_err() {
            return Err(ValidationError::InvalidWebhookKey(self.active_key_name()));
        }
        Ok(())
    }
}

impl fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |key: &str| if key.is_empty() { "<unset>" } else { "[REDACTED]" };
        f.debug_struct("PaymentConfig")
            .field("test_mode", &self.test_mode)
            .field("live_webhook_key", &redact(&self.live_webhook_key))
            .field("test_webhook_key", &redact(&self.test_webhook_key))
            .finish()
    }
}
