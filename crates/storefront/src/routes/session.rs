//! Session reset handler.

use axum::response::{IntoResponse, Redirect};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;

/// Forget the guest's cart and conversation.
#[instrument(skip(session))]
pub async fn reset(session: Session) -> Result<impl IntoResponse> {
    session.flush().await?;
    Ok(Redirect::to("/"))
}
