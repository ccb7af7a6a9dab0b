//! Per-session ordering state and the cart event table.
//!
//! Every guest interaction that touches the cart is expressed as a
//! [`CartEvent`] and applied through [`OrderSession::apply`]. The presentation
//! layer renders from the resulting state instead of mutating it directly.

use serde::{Deserialize, Serialize};

use crate::cart::CartLedger;
use crate::conversation::Conversation;
use crate::menu::{CatalogError, MenuCatalog};
use crate::order::DispatchResult;
use crate::types::MenuItemId;

/// A cart mutation requested by the guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartEvent {
    /// Adjust an item's quantity; negative deltas decrement.
    Add { item_id: MenuItemId, delta: i64 },
    /// Drop an item from the cart entirely.
    Remove { item_id: MenuItemId },
    /// Empty the cart.
    Clear,
}

/// Severity of a notice shown to the guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// One-shot message shown after an interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Everything one guest session owns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSession {
    pub cart: CartLedger,
    pub conversation: Conversation,
    pub notice: Option<Notice>,
}

impl OrderSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a cart event.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownItem` when an `Add` names an item that is
    /// not on the menu. `Remove` of an unknown item is a no-op.
    pub fn apply(&mut self, event: CartEvent, catalog: &MenuCatalog) -> Result<(), CatalogError> {
        match event {
            CartEvent::Add { item_id, delta } => {
                let item = catalog.require(item_id)?;
                self.cart.add(item, delta);
            }
            CartEvent::Remove { item_id } => self.cart.remove(item_id),
            CartEvent::Clear => self.cart.clear(),
        }
        Ok(())
    }

    /// Seed the conversation on first use.
    ///
    /// Returns `true` if the conversation was created by this call.
    pub fn ensure_conversation(&mut self, seed: impl FnOnce() -> Conversation) -> bool {
        if self.conversation.is_empty() {
            self.conversation = seed();
            true
        } else {
            false
        }
    }

    /// Record a dispatch outcome: clear the cart on success and leave a notice.
    pub fn complete_dispatch(&mut self, result: &DispatchResult, success_text: &str) {
        if result.ok {
            self.cart.clear();
            self.notice = Some(Notice::success(success_text));
        } else if result.is_not_configured() {
            self.notice = Some(Notice::error(
                "Ordering via WhatsApp is not configured yet; please order at the counter.",
            ));
        } else {
            self.notice = Some(Notice::error(format!(
                "Could not send your order: {}",
                result.detail
            )));
        }
    }

    /// Remove and return the pending notice.
    pub const fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}
