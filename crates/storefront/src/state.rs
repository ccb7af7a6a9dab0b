//! Application state shared across handlers.

use std::sync::Arc;

use fusion_core::MenuCatalog;

use crate::config::FusionConfig;
use crate::gemini::{ChatCompletion, GeminiClient, GeminiError};
use crate::middleware::SessionLocks;
use crate::services::{OrderDispatcher, WaiterService};
use crate::twilio::{MessageTransport, TwilioClient, TwilioError};

/// Error building the outbound API clients.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("gemini client: {0}")]
    Gemini(#[from] GeminiError),
    #[error("twilio client: {0}")]
    Twilio(#[from] TwilioError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration, the menu, the outbound clients and the per-session locks.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: FusionConfig,
    catalog: MenuCatalog,
    chat: Option<Arc<dyn ChatCompletion>>,
    dispatcher: OrderDispatcher,
    session_locks: SessionLocks,
}

impl AppState {
    /// Create application state with the real Gemini and Twilio clients.
    ///
    /// The Gemini client is only built when an API key is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn new(config: FusionConfig) -> Result<Self, StateError> {
        let chat: Option<Arc<dyn ChatCompletion>> = match &config.gemini {
            Some(gemini) => Some(Arc::new(GeminiClient::new(gemini, config.http_timeout)?)),
            None => None,
        };
        let transport: Arc<dyn MessageTransport> =
            Arc::new(TwilioClient::new(config.http_timeout)?);

        Ok(Self::with_backends(
            config,
            MenuCatalog::fusion_food_lab(),
            chat,
            transport,
        ))
    }

    /// Create application state with explicit backends.
    #[must_use]
    pub fn with_backends(
        config: FusionConfig,
        catalog: MenuCatalog,
        chat: Option<Arc<dyn ChatCompletion>>,
        transport: Arc<dyn MessageTransport>,
    ) -> Self {
        let dispatcher =
            OrderDispatcher::new(transport, config.messaging.clone(), &config.restaurant);
        let session_locks = SessionLocks::new(config.session_idle());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                chat,
                dispatcher,
                session_locks,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &FusionConfig {
        &self.inner.config
    }

    /// Get a reference to the menu.
    #[must_use]
    pub fn catalog(&self) -> &MenuCatalog {
        &self.inner.catalog
    }

    /// Get a reference to the order dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &OrderDispatcher {
        &self.inner.dispatcher
    }

    /// Get a reference to the per-session request locks.
    #[must_use]
    pub fn session_locks(&self) -> &SessionLocks {
        &self.inner.session_locks
    }

    /// Whether the waiter chat is available.
    #[must_use]
    pub fn chat_enabled(&self) -> bool {
        self.inner.chat.is_some()
    }

    /// A waiter bound to this state.
    #[must_use]
    pub fn waiter(&self) -> WaiterService<'_> {
        WaiterService::new(
            self.inner.chat.as_deref(),
            &self.inner.dispatcher,
            &self.inner.catalog,
            &self.inner.config.restaurant.name,
        )
    }
}
