//! Twilio Messages API client.
//!
//! Sends one WhatsApp message per call. There is no retry.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use tracing::{debug, error, instrument, warn};

use super::MessageTransport;
use super::error::TwilioError;
use super::types::{ApiErrorResponse, MessageResource, OutboundMessage, TwilioAccount};

/// Twilio REST API base URL.
const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Twilio API client.
#[derive(Debug, Clone)]
pub struct TwilioClient {
    client: Client,
    base_url: String,
}

impl TwilioClient {
    /// Create a new Twilio client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, TwilioError> {
        Self::with_base_url(timeout, TWILIO_API_BASE)
    }

    /// Create a client against a different API root.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn with_base_url(timeout: Duration, base_url: &str) -> Result<Self, TwilioError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TwilioError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn messages_url(&self, account_sid: &str) -> String {
        format!("{}/Accounts/{account_sid}/Messages.json", self.base_url)
    }

    /// Send a message.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or Twilio rejects the message.
    #[instrument(skip(self, account, message), fields(to = %message.to))]
    pub async fn send_message(
        &self,
        account: &TwilioAccount,
        message: &OutboundMessage,
    ) -> Result<MessageResource, TwilioError> {
        let response = self
            .client
            .post(self.messages_url(&account.account_sid))
            .basic_auth(&account.account_sid, Some(account.auth_token.expose_secret()))
            .form(message)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = serde_json::from_str::<ApiErrorResponse>(&body).map_or_else(
                |_| TwilioError::Api {
                    code: None,
                    message: format!("HTTP {status}: {body}"),
                },
                |api| TwilioError::Api {
                    code: api.code,
                    message: api.message,
                },
            );
            error!(error = %err, "Twilio API error sending message");
            return Err(err);
        }

        let resource: MessageResource =
            serde_json::from_str(&body).map_err(|e| TwilioError::Response(e.to_string()))?;

        debug!(
            sid = %resource.sid,
            status = ?resource.status,
            "Message accepted by Twilio"
        );
        if let Some(provider_error) = resource.provider_error() {
            warn!(
                sid = %resource.sid,
                error = %provider_error,
                "Twilio accepted the message with an error"
            );
        }

        Ok(resource)
    }
}

#[async_trait]
impl MessageTransport for TwilioClient {
    async fn send(
        &self,
        account: &TwilioAccount,
        message: &OutboundMessage,
    ) -> Result<String, TwilioError> {
        self.send_message(account, message)
            .await
            .map(|resource| resource.sid)
    }
}
