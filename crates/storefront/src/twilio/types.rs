//! Twilio Messages API types.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Account credentials for the Messages API.
#[derive(Clone)]
pub struct TwilioAccount {
    pub account_sid: String,
    pub auth_token: SecretString,
}

impl std::fmt::Debug for TwilioAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioAccount")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"[REDACTED]")
            .finish()
    }
}

/// A message to send. Addresses carry the `whatsapp:` channel prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "To")]
    pub to: String,
    #[serde(rename = "Body")]
    pub body: String,
}

/// Message resource returned on success.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResource {
    pub sid: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl MessageResource {
    /// Provider error attached to an accepted message, if any.
    #[must_use]
    pub fn provider_error(&self) -> Option<String> {
        let code = self.error_code?;
        Some(match &self.error_message {
            Some(message) => format!("{code}: {message}"),
            None => code.to_string(),
        })
    }
}

/// Error body returned for 4xx/5xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub code: Option<i64>,
    pub message: String,
}
