//! Order dispatch over WhatsApp.
//!
//! Formats a finished order into one message and hands it to the messaging
//! transport exactly once. Without complete Twilio credentials nothing is
//! sent and the order is written to the log instead.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use fusion_core::{DispatchResult, WhatsAppAddress};
use secrecy::SecretString;
use tracing::{info, instrument, warn};

use crate::config::{MessagingConfig, RestaurantConfig};
use crate::twilio::{MessageTransport, OutboundMessage, TwilioAccount};

/// Sends orders to the restaurant.
#[derive(Clone)]
pub struct OrderDispatcher {
    transport: Arc<dyn MessageTransport>,
    messaging: MessagingConfig,
    restaurant_name: String,
    payment_handle: Option<String>,
}

impl std::fmt::Debug for OrderDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderDispatcher")
            .field("messaging", &self.messaging)
            .field("restaurant_name", &self.restaurant_name)
            .field("payment_handle", &self.payment_handle)
            .finish_non_exhaustive()
    }
}

impl OrderDispatcher {
    #[must_use]
    pub fn new(
        transport: Arc<dyn MessageTransport>,
        messaging: MessagingConfig,
        restaurant: &RestaurantConfig,
    ) -> Self {
        Self {
            transport,
            messaging,
            restaurant_name: restaurant.name.clone(),
            payment_handle: restaurant.payment_handle.clone(),
        }
    }

    /// Whether orders will actually be sent.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.messaging.is_configured()
    }

    /// Build the message body for an order.
    #[must_use]
    pub fn format_message(&self, order_text: &str, placed_at: DateTime<Utc>) -> String {
        let mut body = format!(
            "New {} Order:\n{}\n\nPlaced: {}",
            self.restaurant_name,
            order_text.trim(),
            placed_at.format("%Y-%m-%d %H:%M UTC")
        );
        if let Some(handle) = &self.payment_handle {
            body.push_str("\nPay via: ");
            body.push_str(handle);
        }
        body
    }

    /// Send an order to the configured restaurant number.
    #[instrument(skip_all)]
    pub async fn dispatch(&self, order_text: &str) -> DispatchResult {
        match &self.messaging.to_number {
            Some(to) => self.dispatch_to(order_text, to).await,
            None => self.log_only(order_text),
        }
    }

    /// Send an order to an explicit destination.
    ///
    /// The account SID, auth token and sender number must still be configured.
    #[instrument(skip(self, order_text, destination), fields(to = %destination))]
    pub async fn dispatch_to(
        &self,
        order_text: &str,
        destination: &WhatsAppAddress,
    ) -> DispatchResult {
        let (Some((account_sid, auth_token)), Some(from)) =
            (self.messaging.api_credentials(), &self.messaging.from_number)
        else {
            return self.log_only(order_text);
        };

        let account = TwilioAccount {
            account_sid: account_sid.to_string(),
            auth_token: SecretString::from(auth_token),
        };
        let message = OutboundMessage {
            from: from.channel_address(),
            to: destination.channel_address(),
            body: self.format_message(order_text, Utc::now()),
        };

        match self.transport.send(&account, &message).await {
            Ok(sid) => {
                info!(message_sid = %sid, "Order sent to restaurant");
                DispatchResult::sent(format!("Order sent to the restaurant (message {sid})"))
            }
            Err(e) => {
                warn!(error = %e, "Order dispatch failed");
                DispatchResult::failed(e.to_string())
            }
        }
    }

    fn log_only(&self, order_text: &str) -> DispatchResult {
        info!(
            restaurant = %self.restaurant_name,
            order = %order_text,
            "Messaging not configured, order logged only"
        );
        DispatchResult::not_configured()
    }
}
