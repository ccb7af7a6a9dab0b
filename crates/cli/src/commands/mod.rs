//! CLI command implementations.

pub mod chat;
pub mod menu;
pub mod notify;

use fusion_core::PhoneError;
use fusion_storefront::config::ConfigError;
use fusion_storefront::state::StateError;
use thiserror::Error;

/// Errors shared by the commands that talk to external services.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Environment configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An API client could not be built.
    #[error(transparent)]
    State(#[from] StateError),

    /// A phone number argument is not valid.
    #[error("Invalid phone number: {0}")]
    InvalidNumber(#[from] PhoneError),

    /// The message could not be sent.
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// Reading from the terminal failed.
    #[error("Terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}
