//! Home page route handler.
//!
//! The single page shows the menu, the cart and the waiter chat side by side.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::models::{MenuSectionView, SessionSnapshot, load_order_session, save_order_session};
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub restaurant: String,
    pub tagline: String,
    pub menu: Vec<MenuSectionView>,
    pub snapshot: SessionSnapshot,
}

/// Render the ordering page.
///
/// Starts the waiter conversation on first visit and consumes the pending
/// notice so it is shown exactly once. The session is only written when one
/// of those changed it.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let mut order_session = load_order_session(&session).await?;
    let started = state.waiter().ensure_started(&mut order_session);
    let notice = order_session.take_notice();
    if started || notice.is_some() {
        save_order_session(&session, &order_session).await?;
    }

    let restaurant = &state.config().restaurant;
    Ok(IndexTemplate {
        restaurant: restaurant.name.clone(),
        tagline: restaurant.tagline.clone(),
        menu: MenuSectionView::build(state.catalog(), &order_session.cart),
        snapshot: SessionSnapshot::build(
            &order_session,
            notice,
            state.catalog(),
            state.chat_enabled(),
            state.dispatcher().is_configured(),
        ),
    })
}
