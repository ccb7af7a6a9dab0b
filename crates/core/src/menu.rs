//! The restaurant's menu catalog.
//!
//! The catalog is built once at process start and never mutated. Cart entries
//! keep their own copy of the [`MenuItem`] they were created from.

use std::fmt::Write as _;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CurrencyCode, MenuItemId, Price};

/// Errors from catalog lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// No item has the requested id.
    #[error("menu item {0} not found")]
    UnknownItem(MenuItemId),
}

/// Menu section an item is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuCategory {
    Mains,
    Salads,
    Sides,
    Drinks,
}

impl MenuCategory {
    /// All categories in menu order.
    pub const ALL: [Self; 4] = [Self::Mains, Self::Salads, Self::Sides, Self::Drinks];

    /// Heading shown to guests.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Mains => "Mains",
            Self::Salads => "Salads",
            Self::Sides => "Sides",
            Self::Drinks => "Drinks",
        }
    }
}

/// A dish or drink on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub description: String,
    /// Price per unit in the catalog currency.
    pub unit_price: Decimal,
    pub category: MenuCategory,
    pub vegetarian: bool,
    pub bestseller: bool,
}

impl MenuItem {
    /// Create a menu item with no flags set.
    #[must_use]
    pub fn new(
        id: u32,
        name: &str,
        description: &str,
        unit_price: Decimal,
        category: MenuCategory,
    ) -> Self {
        Self {
            id: MenuItemId::new(id),
            name: name.to_string(),
            description: description.to_string(),
            unit_price,
            category,
            vegetarian: false,
            bestseller: false,
        }
    }

    /// Mark the item as vegetarian.
    #[must_use]
    pub const fn vegetarian(mut self) -> Self {
        self.vegetarian = true;
        self
    }

    /// Mark the item as a bestseller.
    #[must_use]
    pub const fn bestseller(mut self) -> Self {
        self.bestseller = true;
        self
    }
}

/// The full menu plus the currency its prices are quoted in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCatalog {
    items: Vec<MenuItem>,
    currency: CurrencyCode,
}

impl MenuCatalog {
    /// Create a catalog from a list of items.
    ///
    /// Later items with a duplicate id are dropped so lookups stay unambiguous.
    #[must_use]
    pub fn new(items: Vec<MenuItem>, currency: CurrencyCode) -> Self {
        let mut unique: Vec<MenuItem> = Vec::with_capacity(items.len());
        for item in items {
            if !unique.iter().any(|existing| existing.id == item.id) {
                unique.push(item);
            }
        }
        Self {
            items: unique,
            currency,
        }
    }

    /// The Fusion Food Lab house menu.
    #[must_use]
    pub fn fusion_food_lab() -> Self {
        Self::new(
            vec![
                MenuItem::new(
                    1,
                    "Quantum Burger",
                    "Juicy patty with quark cheese & teleportation fries",
                    Decimal::new(1299, 2),
                    MenuCategory::Mains,
                )
                .bestseller(),
                MenuItem::new(
                    2,
                    "Nano Salad",
                    "Microgreens with molecular dressing & quantum croutons",
                    Decimal::new(899, 2),
                    MenuCategory::Salads,
                )
                .vegetarian(),
                MenuItem::new(
                    3,
                    "Black Hole Shake",
                    "Dark chocolate shake with gravitational whipped cream",
                    Decimal::new(699, 2),
                    MenuCategory::Drinks,
                )
                .vegetarian()
                .bestseller(),
                MenuItem::new(
                    4,
                    "Cheesy Smash Burger",
                    "Double smashed patties, molten cheddar, pickles",
                    Decimal::new(1200, 2),
                    MenuCategory::Mains,
                ),
                MenuItem::new(
                    5,
                    "Pepperoni Pizza XL",
                    "Stone-baked, fourteen inches, extra pepperoni",
                    Decimal::new(1800, 2),
                    MenuCategory::Mains,
                )
                .bestseller(),
                MenuItem::new(
                    6,
                    "Truffle Fries",
                    "Hand-cut fries with truffle oil and parmesan",
                    Decimal::new(800, 2),
                    MenuCategory::Sides,
                )
                .vegetarian(),
                MenuItem::new(
                    7,
                    "Nebula Noodles",
                    "Wok-tossed noodles with star anise glaze",
                    Decimal::new(1149, 2),
                    MenuCategory::Mains,
                )
                .vegetarian(),
                MenuItem::new(
                    8,
                    "Photon Lemonade",
                    "Sparkling lemonade with butterfly pea colour shift",
                    Decimal::new(399, 2),
                    MenuCategory::Drinks,
                )
                .vegetarian(),
            ],
            CurrencyCode::USD,
        )
    }

    /// All items in menu order.
    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Currency the catalog is priced in.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Look up an item by id.
    #[must_use]
    pub fn get(&self, id: MenuItemId) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Look up an item by id, failing if it is not on the menu.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownItem` if no item has this id.
    pub fn require(&self, id: MenuItemId) -> Result<&MenuItem, CatalogError> {
        self.get(id).ok_or(CatalogError::UnknownItem(id))
    }

    /// Wrap an amount in the catalog currency.
    #[must_use]
    pub const fn price(&self, amount: Decimal) -> Price {
        Price::new(amount, self.currency)
    }

    /// Items grouped by category, skipping empty categories.
    #[must_use]
    pub fn by_category(&self) -> Vec<(MenuCategory, Vec<&MenuItem>)> {
        MenuCategory::ALL
            .iter()
            .filter_map(|category| {
                let items: Vec<&MenuItem> = self
                    .items
                    .iter()
                    .filter(|item| item.category == *category)
                    .collect();
                (!items.is_empty()).then_some((*category, items))
            })
            .collect()
    }

    /// Plain-text menu listing for the waiter's priming message.
    #[must_use]
    pub fn prompt_listing(&self) -> String {
        let mut out = String::new();
        for (category, items) in self.by_category() {
            let _ = writeln!(out, "{}:", category.label());
            for item in items {
                let mut tags = Vec::new();
                if item.vegetarian {
                    tags.push("vegetarian");
                }
                if item.bestseller {
                    tags.push("bestseller");
                }
                let tags = if tags.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", tags.join(", "))
                };
                let _ = writeln!(
                    out,
                    "- {} ({}): {}{tags}",
                    item.name,
                    self.price(item.unit_price),
                    item.description
                );
            }
        }
        out
    }
}

impl Default for MenuCatalog {
    fn default() -> Self {
        Self::fusion_food_lab()
    }
}
