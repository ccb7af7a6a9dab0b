//! The AI waiter.
//!
//! This service handles one chat turn:
//! 1. Seeding the conversation with the priming prompt and a greeting
//! 2. Appending the guest's message
//! 3. Calling the chat model with the full history
//! 4. Appending the reply and scanning it for the completion marker
//! 5. Dispatching a completed order and clearing the cart on success

use askama::Template;
use fusion_core::{
    ChatRole, Conversation, DispatchResult, MenuCatalog, OrderSession, find_order_marker,
    sanitize_marker_text, strip_order_marker,
};
use tracing::{info, instrument, warn};

use crate::gemini::{ChatCompletion, GeminiError};
use crate::services::dispatch::OrderDispatcher;

/// Priming prompt template for the waiter.
#[derive(Template)]
#[template(path = "waiter/priming.txt")]
struct PrimingPromptTemplate<'a> {
    restaurant: &'a str,
    currency: &'a str,
    menu: &'a str,
}

/// Render the priming prompt with the menu and the completion-marker rules.
#[must_use]
pub fn priming_prompt(restaurant: &str, catalog: &MenuCatalog) -> String {
    let menu = catalog.prompt_listing();
    PrimingPromptTemplate {
        restaurant,
        currency: catalog.currency().code(),
        menu: &menu,
    }
    .render()
    .unwrap_or_else(|_| format!("You are the waiter at {restaurant}. The menu is:\n{menu}"))
}

/// First assistant message shown to the guest.
#[must_use]
pub fn greeting(restaurant: &str) -> String {
    format!(
        "Welcome to {restaurant}! I'm your Quantum Waiter. Ask me about any dish, \
         or tell me what you'd like and I'll put the order through."
    )
}

/// A fresh conversation: hidden priming message followed by the greeting.
#[must_use]
pub fn seed_conversation(restaurant: &str, catalog: &MenuCatalog) -> Conversation {
    Conversation::seeded(priming_prompt(restaurant, catalog), greeting(restaurant))
}

/// Errors that can occur in the waiter service.
#[derive(Debug, thiserror::Error)]
pub enum WaiterError {
    /// No chat model is configured.
    #[error("The waiter is off duty: chat is not configured (set GEMINI_API_KEY).")]
    Disabled,

    /// The chat model call failed.
    #[error("The waiter could not answer: {0}")]
    Chat(#[from] GeminiError),
}

/// The outcome of one successful chat turn.
#[derive(Debug, Clone)]
pub struct WaiterReply {
    /// Reply text with the completion marker removed.
    pub text: String,
    /// Sanitized order text taken from the marker, if any.
    pub order_text: Option<String>,
    /// Result of dispatching that order.
    pub dispatch: Option<DispatchResult>,
}

/// The AI waiter for one restaurant.
pub struct WaiterService<'a> {
    chat: Option<&'a dyn ChatCompletion>,
    dispatcher: &'a OrderDispatcher,
    catalog: &'a MenuCatalog,
    restaurant: &'a str,
}

impl<'a> WaiterService<'a> {
    /// Create a new waiter service. `chat` is `None` when chat is disabled.
    #[must_use]
    pub const fn new(
        chat: Option<&'a dyn ChatCompletion>,
        dispatcher: &'a OrderDispatcher,
        catalog: &'a MenuCatalog,
        restaurant: &'a str,
    ) -> Self {
        Self {
            chat,
            dispatcher,
            catalog,
            restaurant,
        }
    }

    /// Whether a chat model is available.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.chat.is_some()
    }

    /// Seed the session's conversation if it has not started yet.
    ///
    /// Returns `true` if the session changed.
    pub fn ensure_started(&self, session: &mut OrderSession) -> bool {
        self.is_enabled()
            && session.ensure_conversation(|| seed_conversation(self.restaurant, self.catalog))
    }

    /// Handle one guest message.
    ///
    /// Returns `Ok(None)` when the message is blank. On a model failure the
    /// guest's message stays in the history and no reply is appended.
    ///
    /// # Errors
    ///
    /// Returns `WaiterError::Disabled` without touching the session when chat
    /// is not configured, or `WaiterError::Chat` when the model call fails.
    #[instrument(skip(self, session, user_text), fields(history_len = session.conversation.len()))]
    pub async fn reply(
        &self,
        session: &mut OrderSession,
        user_text: &str,
    ) -> Result<Option<WaiterReply>, WaiterError> {
        let user_text = user_text.trim();
        if user_text.is_empty() {
            return Ok(None);
        }

        let Some(chat) = self.chat else {
            return Err(WaiterError::Disabled);
        };

        self.ensure_started(session);
        session.conversation.append(ChatRole::User, user_text);

        let reply = match chat.complete(session.conversation.history()).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Chat completion failed");
                return Err(e.into());
            }
        };
        session.conversation.append(ChatRole::Assistant, reply.as_str());

        let order_text = find_order_marker(&reply).and_then(sanitize_marker_text);
        let dispatch = match &order_text {
            Some(text) => {
                info!(order_chars = text.chars().count(), "Waiter completed an order");
                let result = self.dispatcher.dispatch(text).await;
                session.complete_dispatch(&result, "Order placed! The kitchen has your order.");
                Some(result)
            }
            None => None,
        };

        Ok(Some(WaiterReply {
            text: strip_order_marker(&reply),
            order_text,
            dispatch,
        }))
    }
}
