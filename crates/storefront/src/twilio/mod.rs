//! Twilio integration for sending orders over WhatsApp.
//!
//! This module provides:
//! - [`MessageTransport`], the seam the order dispatcher talks to
//! - [`TwilioClient`], its implementation over the Messages API

mod client;
mod error;
mod types;

use async_trait::async_trait;

pub use client::TwilioClient;
pub use error::TwilioError;
pub use types::{ApiErrorResponse, MessageResource, OutboundMessage, TwilioAccount};

/// Something that can deliver one text message.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Send `message` once and return the provider's message id.
    async fn send(
        &self,
        account: &TwilioAccount,
        message: &OutboundMessage,
    ) -> Result<String, TwilioError>;
}
