//! Session middleware configuration.
//!
//! Guest sessions live in an in-memory Moka store keyed by the session
//! cookie. A session is created on first write and evicted from the store
//! once its inactivity expiry passes, or removed when the guest resets it.

use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;

use crate::config::FusionConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "fusion_session";

/// Upper bound on stored sessions.
const MAX_SESSIONS: u64 = 10_000;

/// Create the session store.
///
/// Records are evicted at their expiry date, which inactivity expiry moves
/// forward on every write.
#[must_use]
pub fn create_session_store() -> MokaStore {
    MokaStore::new(Some(MAX_SESSIONS))
}

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &FusionConfig) -> SessionManagerLayer<MokaStore> {
    SessionManagerLayer::new(create_session_store())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::minutes(config.session_idle_minutes),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use tower_sessions::SessionStore;
    use tower_sessions::cookie::time::{self, OffsetDateTime};
    use tower_sessions::session::{Id, Record};

    use super::*;

    fn record_expiring_in(lifetime: time::Duration) -> Record {
        Record {
            id: Id::default(),
            data: HashMap::new(),
            expiry_date: OffsetDateTime::now_utc() + lifetime,
        }
    }

    #[tokio::test]
    async fn test_live_record_is_loaded() {
        let store = create_session_store();
        let mut record = record_expiring_in(time::Duration::minutes(60));
        store.create(&mut record).await.unwrap();

        let loaded = store.load(&record.id).await.unwrap();
        assert_eq!(loaded.map(|r| r.id), Some(record.id));
    }

    #[tokio::test]
    async fn test_record_is_gone_after_expiry() {
        let store = create_session_store();
        let mut record = record_expiring_in(time::Duration::milliseconds(200));
        store.create(&mut record).await.unwrap();

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(store.load(&record.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deleted_record_is_gone() {
        let store = create_session_store();
        let mut record = record_expiring_in(time::Duration::minutes(60));
        store.create(&mut record).await.unwrap();

        store.delete(&record.id).await.unwrap();
        assert!(store.load(&record.id).await.unwrap().is_none());
    }
}
