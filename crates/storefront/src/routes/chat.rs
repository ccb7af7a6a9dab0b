//! Waiter chat route handler.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use fusion_core::Notice;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::models::{load_order_session, save_order_session};
use crate::services::WaiterError;
use crate::state::AppState;

/// Chat form data.
#[derive(Debug, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: String,
}

/// Send one message to the waiter.
///
/// Blank messages are ignored. Model failures become an error notice and the
/// guest's message stays in the history.
#[instrument(skip(state, session, form))]
pub async fn send(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ChatForm>,
) -> Result<impl IntoResponse> {
    let mut order_session = load_order_session(&session).await?;

    match state.waiter().reply(&mut order_session, &form.message).await {
        Ok(_) => {}
        Err(e @ WaiterError::Disabled) => order_session.notice = Some(Notice::info(e.to_string())),
        Err(e @ WaiterError::Chat(_)) => order_session.notice = Some(Notice::error(e.to_string())),
    }

    save_order_session(&session, &order_session).await?;
    Ok(Redirect::to("/"))
}
