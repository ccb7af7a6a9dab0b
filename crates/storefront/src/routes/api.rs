//! JSON API handlers.
//!
//! Read-only views of the menu and the guest's session for scripts and tests.

use axum::{Json, extract::State};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::models::{MenuSectionView, SessionSnapshot, load_order_session};
use crate::state::AppState;

/// The menu grouped by category, with the guest's cart quantities.
#[instrument(skip(state, session))]
pub async fn menu(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<MenuSectionView>>> {
    let order_session = load_order_session(&session).await?;
    Ok(Json(MenuSectionView::build(
        state.catalog(),
        &order_session.cart,
    )))
}

/// The guest's cart, visible chat and pending notice.
///
/// Viewing does not consume the notice.
#[instrument(skip(state, session))]
pub async fn session_state(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<SessionSnapshot>> {
    let order_session = load_order_session(&session).await?;
    Ok(Json(SessionSnapshot::build(
        &order_session,
        order_session.notice.clone(),
        state.catalog(),
        state.chat_enabled(),
        state.dispatcher().is_configured(),
    )))
}
