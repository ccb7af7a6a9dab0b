//! Checkout route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
};
use chrono::Utc;
use fusion_core::{Notice, Order};
use tower_sessions::Session;
use tracing::{info, instrument};

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::models::{load_order_session, save_order_session};
use crate::state::AppState;

/// Guest-facing confirmation after a successful send.
pub const CHECKOUT_SUCCESS: &str = "Order sent to the restaurant via WhatsApp!";

/// Shown when checking out with nothing in the cart.
pub const EMPTY_CART: &str = "Your cart is empty!";

/// Preview of the message the restaurant would receive.
#[derive(Template, WebTemplate)]
#[template(path = "checkout_preview.html")]
pub struct CheckoutPreviewTemplate {
    pub restaurant: String,
    pub body: Option<String>,
    pub messaging_configured: bool,
}

/// Send the cart to the restaurant.
///
/// The cart is cleared only when the message was actually sent.
#[instrument(skip(state, session))]
pub async fn place(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let mut order_session = load_order_session(&session).await?;

    match Order::from_ledger(&order_session.cart, state.catalog().currency()) {
        Some(order) => {
            add_breadcrumb("checkout", "place order", None);
            info!(lines = order.lines.len(), "Checkout requested");
            let result = state.dispatcher().dispatch(&order.to_text()).await;
            order_session.complete_dispatch(&result, CHECKOUT_SUCCESS);
        }
        None => order_session.notice = Some(Notice::info(EMPTY_CART)),
    }

    save_order_session(&session, &order_session).await?;
    Ok(Redirect::to("/"))
}

/// Show the WhatsApp message the current cart would produce.
#[instrument(skip(state, session))]
pub async fn preview(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let order_session = load_order_session(&session).await?;
    let body = Order::from_ledger(&order_session.cart, state.catalog().currency())
        .map(|order| state.dispatcher().format_message(&order.to_text(), Utc::now()));

    Ok(CheckoutPreviewTemplate {
        restaurant: state.config().restaurant.name.clone(),
        body,
        messaging_configured: state.dispatcher().is_configured(),
    })
}
