//! Twilio-related errors.

use thiserror::Error;

/// Errors that can occur when sending through Twilio.
#[derive(Debug, Error)]
pub enum TwilioError {
    /// HTTP request failed.
    #[error("Twilio request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("Twilio request timed out")]
    Timeout,

    /// Failed to parse response.
    #[error("Twilio response error: {0}")]
    Response(String),

    /// Twilio API returned an error.
    #[error("Twilio API error {}: {message}", code_label(.code))]
    Api {
        /// Twilio error code (e.g. 21211).
        code: Option<i64>,
        /// Error message from Twilio.
        message: String,
    },

    /// Client configuration error.
    #[error("Twilio configuration error: {0}")]
    Config(String),
}

#[allow(clippy::ref_option)]
fn code_label(code: &Option<i64>) -> String {
    code.map_or_else(|| "?".to_string(), |c| c.to_string())
}

impl From<reqwest::Error> for TwilioError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(err.to_string())
        }
    }
}
