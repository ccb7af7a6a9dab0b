//! Session-related types.
//!
//! Each guest's cart, conversation and pending notice live in one
//! [`OrderSession`] value stored under a single session key.

use fusion_core::OrderSession;
use tower_sessions::Session;

/// Session keys for ordering data.
pub mod keys {
    /// Key for the guest's [`fusion_core::OrderSession`].
    pub const ORDER_SESSION: &str = "order_session";
}

/// Load the guest's ordering state, starting fresh when none is stored.
///
/// # Errors
///
/// Returns an error if the session store cannot be read.
pub async fn load_order_session(
    session: &Session,
) -> Result<OrderSession, tower_sessions::session::Error> {
    Ok(session
        .get::<OrderSession>(keys::ORDER_SESSION)
        .await?
        .unwrap_or_default())
}

/// Store the guest's ordering state.
///
/// # Errors
///
/// Returns an error if the session store cannot be written.
pub async fn save_order_session(
    session: &Session,
    order_session: &OrderSession,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::ORDER_SESSION, order_session).await
}
