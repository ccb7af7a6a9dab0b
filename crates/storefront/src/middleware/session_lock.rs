//! Per-session request serialization.
//!
//! Requests carrying the same session cookie run one at a time. The lock is
//! held from before the session is loaded until after the session layer has
//! written it back, so a slow waiter turn and a cart change from the same
//! guest cannot overwrite each other.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::COOKIE},
    middleware::Next,
    response::Response,
};
use moka::future::Cache;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tower_sessions::{cookie::Cookie, session::Id};

use crate::middleware::session::SESSION_COOKIE_NAME;
use crate::state::AppState;

/// Upper bound on tracked sessions.
const MAX_TRACKED_SESSIONS: u64 = 10_000;

/// One async mutex per live session id.
///
/// Entries idle for longer than the session lifetime are evicted.
#[derive(Clone)]
pub struct SessionLocks {
    locks: Cache<Id, Arc<Mutex<()>>>,
}

impl SessionLocks {
    /// Create the lock table with the given idle lifetime.
    #[must_use]
    pub fn new(idle: Duration) -> Self {
        Self {
            locks: Cache::builder()
                .max_capacity(MAX_TRACKED_SESSIONS)
                .time_to_idle(idle)
                .build(),
        }
    }

    /// Wait for exclusive access to a session.
    pub async fn acquire(&self, id: Id) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .get_with(id, async { Arc::new(Mutex::new(())) })
            .await;
        lock.lock_owned().await
    }
}

/// Session id from the request's session cookie, if it carries a valid one.
fn session_id(headers: &HeaderMap) -> Option<Id> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .and_then(|cookie| cookie.value().parse().ok())
}

/// Middleware that runs requests of the same session one after another.
///
/// Requests without a session cookie start a fresh session and pass through.
pub async fn session_lock_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(id) = session_id(request.headers()) else {
        return next.run(request).await;
    };

    let _guard = state.session_locks().acquire(id).await;
    next.run(request).await
}
