//! Display data for templates and the JSON API.
//!
//! Views are built from the catalog and an [`OrderSession`] on every request
//! and never stored. Prices are pre-formatted in the catalog currency.

use fusion_core::{
    CartLedger, ChatRole, ConversationMessage, MenuCatalog, MenuItem, Notice, NoticeLevel,
    OrderSession, strip_order_marker,
};
use serde::Serialize;

/// A menu item as shown to guests.
#[derive(Debug, Clone, Serialize)]
pub struct MenuItemView {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub price: String,
    pub vegetarian: bool,
    pub bestseller: bool,
    /// Units of this item currently in the guest's cart.
    pub in_cart: u32,
}

impl MenuItemView {
    fn new(item: &MenuItem, catalog: &MenuCatalog, cart: &CartLedger) -> Self {
        Self {
            id: item.id.as_u32(),
            name: item.name.clone(),
            description: item.description.clone(),
            price: catalog.price(item.unit_price).display(),
            vegetarian: item.vegetarian,
            bestseller: item.bestseller,
            in_cart: cart.quantity(item.id),
        }
    }
}

/// One menu heading with its items.
#[derive(Debug, Clone, Serialize)]
pub struct MenuSectionView {
    pub label: &'static str,
    pub items: Vec<MenuItemView>,
}

impl MenuSectionView {
    /// Group the catalog by category, annotating cart quantities.
    #[must_use]
    pub fn build(catalog: &MenuCatalog, cart: &CartLedger) -> Vec<Self> {
        catalog
            .by_category()
            .into_iter()
            .map(|(category, items)| Self {
                label: category.label(),
                items: items
                    .into_iter()
                    .map(|item| MenuItemView::new(item, catalog, cart))
                    .collect(),
            })
            .collect()
    }
}

/// One cart line.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub item_id: u32,
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub item_count: u64,
    pub is_empty: bool,
}

impl CartView {
    #[must_use]
    pub fn build(cart: &CartLedger, catalog: &MenuCatalog) -> Self {
        Self {
            lines: cart
                .entries()
                .iter()
                .map(|entry| CartLineView {
                    item_id: entry.item.id.as_u32(),
                    name: entry.item.name.clone(),
                    quantity: entry.quantity,
                    unit_price: catalog.price(entry.item.unit_price).display(),
                    line_total: catalog.price(entry.line_total()).display(),
                })
                .collect(),
            total: catalog.price(cart.total()).display(),
            item_count: cart.item_count(),
            is_empty: cart.is_empty(),
        }
    }
}

/// A chat bubble. Assistant text never shows the completion marker.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessageView {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessageView {
    #[must_use]
    pub fn is_user(&self) -> bool {
        self.role == ChatRole::User
    }
}

impl From<&ConversationMessage> for ChatMessageView {
    fn from(message: &ConversationMessage) -> Self {
        let content = match message.role {
            ChatRole::Assistant => strip_order_marker(&message.content),
            ChatRole::User => message.content.clone(),
        };
        Self {
            role: message.role,
            content,
        }
    }
}

/// A notice banner.
#[derive(Debug, Clone, Serialize)]
pub struct NoticeView {
    /// CSS class: `success`, `info` or `error`.
    pub level: &'static str,
    pub text: String,
}

impl From<Notice> for NoticeView {
    fn from(notice: Notice) -> Self {
        let level = match notice.level {
            NoticeLevel::Success => "success",
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        };
        Self {
            level,
            text: notice.text,
        }
    }
}

/// Everything the page needs about one guest's session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub cart: CartView,
    pub chat: Vec<ChatMessageView>,
    pub chat_enabled: bool,
    pub messaging_configured: bool,
    pub notice: Option<NoticeView>,
}

impl SessionSnapshot {
    /// Build a snapshot. The notice is passed separately so callers decide
    /// whether viewing consumes it.
    #[must_use]
    pub fn build(
        session: &OrderSession,
        notice: Option<Notice>,
        catalog: &MenuCatalog,
        chat_enabled: bool,
        messaging_configured: bool,
    ) -> Self {
        Self {
            cart: CartView::build(&session.cart, catalog),
            chat: session
                .conversation
                .visible()
                .iter()
                .map(ChatMessageView::from)
                .collect(),
            chat_enabled,
            messaging_configured,
            notice: notice.map(NoticeView::from),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use fusion_core::{CartEvent, Conversation, MenuItemId};

    use super::*;

    #[test]
    fn test_cart_view_formats_prices() {
        let catalog = MenuCatalog::fusion_food_lab();
        let mut session = OrderSession::default();
        session
            .apply(
                CartEvent::Add {
                    item_id: MenuItemId::new(1),
                    delta: 2,
                },
                &catalog,
            )
            .unwrap();

        let view = CartView::build(&session.cart, &catalog);
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].unit_price, "$12.99");
        assert_eq!(view.lines[0].line_total, "$25.98");
        assert_eq!(view.total, "$25.98");
        assert_eq!(view.item_count, 2);
        assert!(!view.is_empty);
    }

    #[test]
    fn test_menu_sections_show_cart_quantities() {
        let catalog = MenuCatalog::fusion_food_lab();
        let mut cart = CartLedger::new();
        cart.add(catalog.get(MenuItemId::new(3)).unwrap(), 4);

        let sections = MenuSectionView::build(&catalog, &cart);
        assert_eq!(sections[0].label, "Mains");
        let shake = sections
            .iter()
            .flat_map(|s| &s.items)
            .find(|item| item.id == 3)
            .unwrap();
        assert_eq!(shake.in_cart, 4);
        assert_eq!(shake.price, "$6.99");
    }

    #[test]
    fn test_snapshot_hides_priming_and_marker() {
        let mut session = OrderSession::default();
        session.conversation = Conversation::seeded("priming prompt", "Welcome!");
        session.conversation.append(ChatRole::User, "one shake");
        session.conversation.append(
            ChatRole::Assistant,
            "Done! [ORDER_COMPLETE: 1x Black Hole Shake ($6.99), Total: $6.99]",
        );

        let snapshot = SessionSnapshot::build(
            &session,
            Some(Notice::success("Order placed!")),
            &MenuCatalog::fusion_food_lab(),
            true,
            false,
        );

        let contents: Vec<&str> = snapshot.chat.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["Welcome!", "one shake", "Done!"]);
        assert!(snapshot.chat[1].is_user());
        assert_eq!(snapshot.notice.unwrap().level, "success");
    }
}
