//! Cart route handlers.
//!
//! Every handler turns its form into a [`CartEvent`], applies it to the
//! guest's [`fusion_core::OrderSession`] and redirects back to the page.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use fusion_core::{CartEvent, MenuItemId, Notice};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::{load_order_session, save_order_session};
use crate::state::AppState;

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub item_id: MenuItemId,
    /// Defaults to one unit.
    pub quantity: Option<u32>,
}

/// Quantity adjustment form data (the +/- buttons).
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub item_id: MenuItemId,
    pub delta: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_id: MenuItemId,
}

/// Apply one event to the guest's session and go back to the page.
async fn apply_event(
    state: &AppState,
    session: &Session,
    event: CartEvent,
    notice: Option<Notice>,
) -> Result<Redirect> {
    let mut order_session = load_order_session(session).await?;
    order_session.apply(event, state.catalog())?;
    if let Some(notice) = notice {
        order_session.notice = Some(notice);
    }
    save_order_session(session, &order_session).await?;
    Ok(Redirect::to("/"))
}

/// Add an item to the cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<impl IntoResponse> {
    let quantity = form.quantity.unwrap_or(1);
    if quantity == 0 {
        return Err(AppError::BadRequest("quantity must be at least 1".to_string()));
    }

    let item = state.catalog().require(form.item_id)?;
    let notice = Notice::success(format!("Added {} to your cart.", item.name));
    add_breadcrumb("cart", "add", Some(&[("item", item.name.as_str())]));

    apply_event(
        &state,
        &session,
        CartEvent::Add {
            item_id: form.item_id,
            delta: i64::from(quantity),
        },
        Some(notice),
    )
    .await
}

/// Adjust an item's quantity by a signed delta.
///
/// Dropping to zero or below removes the line.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<impl IntoResponse> {
    apply_event(
        &state,
        &session,
        CartEvent::Add {
            item_id: form.item_id,
            delta: form.delta,
        },
        None,
    )
    .await
}

/// Remove an item from the cart.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<impl IntoResponse> {
    state.catalog().require(form.item_id)?;
    apply_event(
        &state,
        &session,
        CartEvent::Remove {
            item_id: form.item_id,
        },
        None,
    )
    .await
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    apply_event(&state, &session, CartEvent::Clear, None).await
}
