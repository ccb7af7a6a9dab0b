//! WhatsApp test notification command.
//!
//! # Usage
//!
//! ```bash
//! fusion-cli notify-test
//! fusion-cli notify-test --to +447700900123 --text "2x Truffle Fries (\$8.00)"
//! ```
//!
//! # Environment Variables
//!
//! - `TWILIO_ACCOUNT_SID`, `TWILIO_AUTH_TOKEN` - Twilio API credentials
//! - `TWILIO_WHATSAPP_NUMBER` - Sender number
//! - `RESTAURANT_WHATSAPP_NUMBER` - Default destination

use fusion_core::WhatsAppAddress;
use fusion_storefront::config::FusionConfig;
use fusion_storefront::state::AppState;

use super::CommandError;

/// Order text used when `--text` is not given.
pub const DEFAULT_TEST_ORDER: &str = "1x Photon Lemonade ($3.99)\nTotal: $3.99";

/// Send one order message through the dispatcher.
///
/// A missing configuration is reported as a warning, not an error, so the
/// command can be used to check what would be sent.
///
/// # Errors
///
/// Returns an error if configuration is invalid, `to` is not a valid number,
/// or the messaging provider rejects the message.
pub async fn send_test(text: &str, to: Option<&str>) -> Result<(), CommandError> {
    let config = FusionConfig::from_env()?;
    let state = AppState::new(config)?;
    let dispatcher = state.dispatcher();

    let result = match to {
        Some(number) => {
            let destination = WhatsAppAddress::parse(number)?;
            dispatcher.dispatch_to(text, &destination).await
        }
        None => dispatcher.dispatch(text).await,
    };

    if result.ok {
        tracing::info!("{}", result.detail);
        Ok(())
    } else if result.is_not_configured() {
        tracing::warn!(
            "Messaging is not configured; set TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN, \
             TWILIO_WHATSAPP_NUMBER and RESTAURANT_WHATSAPP_NUMBER"
        );
        Ok(())
    } else {
        Err(CommandError::SendFailed(result.detail))
    }
}
