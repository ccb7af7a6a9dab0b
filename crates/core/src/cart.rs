//! The cart ledger.
//!
//! Entries are kept in insertion order with unique item ids. Every entry has a
//! quantity of at least one; an adjustment that would bring it to zero or
//! below removes the entry instead. The total is always derived from the
//! entries and never stored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::menu::MenuItem;
use crate::types::MenuItemId;

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    /// Snapshot of the menu item at the time it was added.
    pub item: MenuItem,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartEntry {
    /// Quantity times unit price, unrounded.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.item.unit_price * Decimal::from(self.quantity)
    }
}

/// Mapping from menu item id to cart entry for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLedger {
    entries: Vec<CartEntry>,
}

impl CartLedger {
    /// Create an empty ledger.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adjust the quantity of `item` by `delta`.
    ///
    /// Creates the entry if it is absent and `delta` is positive. Removes the
    /// entry if the resulting quantity is zero or less. Never fails.
    pub fn add(&mut self, item: &MenuItem, delta: i64) {
        match self.position(item.id) {
            Some(index) => {
                let Some(entry) = self.entries.get_mut(index) else {
                    return;
                };
                let next = i64::from(entry.quantity).saturating_add(delta);
                if next <= 0 {
                    self.entries.remove(index);
                } else {
                    entry.quantity = u32::try_from(next).unwrap_or(u32::MAX);
                }
            }
            None if delta > 0 => {
                self.entries.push(CartEntry {
                    item: item.clone(),
                    quantity: u32::try_from(delta).unwrap_or(u32::MAX),
                });
            }
            None => {}
        }
    }

    /// Delete the entry for `id` if present.
    pub fn remove(&mut self, id: MenuItemId) {
        self.entries.retain(|entry| entry.item.id != id);
    }

    /// Empty the ledger.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Sum of quantity times unit price over all entries.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.entries.iter().map(CartEntry::line_total).sum()
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// The entry for `id`, if any.
    #[must_use]
    pub fn get(&self, id: MenuItemId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| entry.item.id == id)
    }

    /// Quantity of `id` in the cart (0 when absent).
    #[must_use]
    pub fn quantity(&self, id: MenuItemId) -> u32 {
        self.get(id).map_or(0, |entry| entry.quantity)
    }

    /// Total number of units across all entries.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| u64::from(entry.quantity))
            .sum()
    }

    /// Number of distinct items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, id: MenuItemId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.item.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::menu::{MenuCatalog, MenuCategory};

    fn item(id: u32, price: i64) -> MenuItem {
        MenuItem::new(
            id,
            &format!("Item {id}"),
            "",
            Decimal::new(price, 0),
            MenuCategory::Mains,
        )
    }

    #[test]
    fn test_add_creates_and_increments() {
        let mut cart = CartLedger::new();
        let a = item(1, 25);
        cart.add(&a, 1);
        cart.add(&a, 2);
        assert_eq!(cart.quantity(a.id), 3);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total(), Decimal::new(75, 0));
    }

    #[test]
    fn test_add_non_positive_delta_on_absent_item_is_noop() {
        let mut cart = CartLedger::new();
        cart.add(&item(1, 10), 0);
        cart.add(&item(1, 10), -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_decrement_to_zero_removes_entry() {
        let mut cart = CartLedger::new();
        let a = item(1, 10);
        cart.add(&a, 1);
        cart.add(&a, -1);
        assert!(cart.is_empty());
        assert!(cart.get(a.id).is_none());
    }

    #[test]
    fn test_large_negative_delta_removes_entry() {
        let mut cart = CartLedger::new();
        let a = item(1, 10);
        cart.add(&a, 2);
        cart.add(&a, -50);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = CartLedger::new();
        cart.add(&item(1, 10), 1);
        cart.remove(MenuItemId::new(2));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_add_remove_clear_scenario() {
        let mut cart = CartLedger::new();
        let a = item(1, 25);
        let b = item(2, 40);
        cart.add(&a, 1);
        cart.add(&b, 1);
        assert_eq!(cart.total(), Decimal::new(65, 0));

        cart.remove(a.id);
        assert_eq!(cart.total(), Decimal::new(40, 0));

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_inverse_adjustments_restore_ledger() {
        let mut cart = CartLedger::new();
        let a = item(1, 25);
        let b = item(2, 40);
        cart.add(&a, 3);
        cart.add(&b, 1);
        let before = cart.clone();

        cart.add(&a, -2);
        cart.add(&a, 2);
        assert_eq!(cart, before);

        // Fully removed and re-added: same contents, new position.
        cart.add(&a, -3);
        cart.add(&a, 3);
        assert_eq!(cart.total(), before.total());
        assert_eq!(cart.quantity(a.id), 3);
        assert_eq!(cart.entries()[0].item.id, b.id);
        assert_eq!(cart.entries()[1].item.id, a.id);
    }

    #[test]
    fn test_total_keeps_full_precision() {
        let catalog = MenuCatalog::fusion_food_lab();
        let burger = catalog.get(MenuItemId::new(1)).unwrap();
        let shake = catalog.get(MenuItemId::new(3)).unwrap();

        let mut cart = CartLedger::new();
        cart.add(burger, 2);
        cart.add(shake, 1);
        assert_eq!(cart.total(), Decimal::new(3297, 2));
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_total_matches_entries_over_operation_sequence() {
        let items: Vec<MenuItem> = (1..=4).map(|id| item(id, i64::from(id) * 3)).collect();
        let mut cart = CartLedger::new();

        // Deterministic pseudo-random walk over add/remove.
        let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;

            let target = &items[usize::try_from(seed % 4).unwrap()];
            if seed % 11 == 0 {
                cart.remove(target.id);
            } else {
                let delta = i64::try_from(seed % 7).unwrap() - 3;
                cart.add(target, delta);
            }

            let expected: Decimal = cart
                .entries()
                .iter()
                .map(|e| e.item.unit_price * Decimal::from(e.quantity))
                .sum();
            assert_eq!(cart.total(), expected);
            assert!(cart.entries().iter().all(|e| e.quantity >= 1));

            let mut ids: Vec<_> = cart.entries().iter().map(|e| e.item.id).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), cart.len());
        }
    }

    #[test]
    fn test_serde_roundtrip_preserves_order() {
        let mut cart = CartLedger::new();
        cart.add(&item(2, 5), 1);
        cart.add(&item(1, 5), 4);

        let json = serde_json::to_string(&cart).unwrap();
        let parsed: CartLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cart);
    }
}
