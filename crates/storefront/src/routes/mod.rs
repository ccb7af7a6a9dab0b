//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                   - Ordering page (menu, cart, waiter chat)
//! GET  /health             - Health check
//!
//! # Cart (form posts, redirect to /)
//! POST /cart/add           - Add an item (item_id, quantity?)
//! POST /cart/update        - Adjust quantity (item_id, delta)
//! POST /cart/remove        - Remove an item (item_id)
//! POST /cart/clear         - Empty the cart
//!
//! # Checkout
//! POST /checkout           - Send the cart to the restaurant over WhatsApp
//! GET  /checkout/preview   - Preview the outgoing message
//!
//! # Waiter
//! POST /chat               - Send a message to the AI waiter
//! POST /session/reset      - Forget cart and conversation
//!
//! # JSON API
//! GET  /api/menu           - Menu with cart quantities
//! GET  /api/state          - Cart, visible chat and pending notice
//! ```

pub mod api;
pub mod cart;
pub mod chat;
pub mod checkout;
pub mod home;
pub mod session;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{
    create_session_layer, request_id_middleware, security_headers_middleware,
    session_lock_middleware,
};
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/menu", get(api::menu))
        .route("/state", get(api::session_state))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::place))
        .route("/checkout/preview", get(checkout::preview))
        .route("/chat", post(chat::send))
        .route("/session/reset", post(session::reset))
        .nest("/api", api_routes())
}

/// Build the application with its session, header and tracing middleware.
///
/// The session lock wraps the session layer so that a request's store write
/// completes before the next request of that session loads it. Sentry layers
/// are added by the binary.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    routes()
        .layer(session_layer)
        .layer(from_fn_with_state(state.clone(), session_lock_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the chat model or
/// the messaging provider.
async fn health() -> &'static str {
    "ok"
}
