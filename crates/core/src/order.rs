//! Orders and dispatch results.
//!
//! An [`Order`] is an ephemeral snapshot of a cart taken at checkout. It is
//! formatted into the order text handed to the dispatcher and then dropped.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::CartLedger;
use crate::types::{CurrencyCode, Price};

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

/// A finished order ready to be sent to the restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub lines: Vec<OrderLine>,
    pub total: Decimal,
    pub currency: CurrencyCode,
}

impl Order {
    /// Snapshot a cart. Returns `None` for an empty cart.
    #[must_use]
    pub fn from_ledger(ledger: &CartLedger, currency: CurrencyCode) -> Option<Self> {
        if ledger.is_empty() {
            return None;
        }

        let lines = ledger
            .entries()
            .iter()
            .map(|entry| OrderLine {
                name: entry.item.name.clone(),
                unit_price: entry.item.unit_price,
                quantity: entry.quantity,
            })
            .collect();

        Some(Self {
            lines,
            total: ledger.total(),
            currency,
        })
    }

    /// Human-readable order text, one line per item followed by the total.
    ///
    /// ```text
    /// 2x Quantum Burger ($12.99)
    /// 1x Black Hole Shake ($6.99)
    /// Total: $32.97
    /// ```
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut lines: Vec<String> = self
            .lines
            .iter()
            .map(|line| {
                format!(
                    "{}x {} ({})",
                    line.quantity,
                    line.name,
                    Price::new(line.unit_price, self.currency)
                )
            })
            .collect();
        lines.push(format!("Total: {}", Price::new(self.total, self.currency)));
        lines.join("\n")
    }
}

/// Outcome of handing an order to the messaging transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchResult {
    pub ok: bool,
    pub detail: String,
}

impl DispatchResult {
    /// Detail reported when transport credentials are missing.
    pub const NOT_CONFIGURED: &'static str = "not configured";

    /// The message was accepted by the transport.
    #[must_use]
    pub fn sent(detail: impl Into<String>) -> Self {
        Self {
            ok: true,
            detail: detail.into(),
        }
    }

    /// The message was not delivered.
    #[must_use]
    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            ok: false,
            detail: detail.into(),
        }
    }

    /// Credentials are missing; nothing was attempted.
    #[must_use]
    pub fn not_configured() -> Self {
        Self::failed(Self::NOT_CONFIGURED)
    }

    /// Whether this result is the "not configured" branch.
    #[must_use]
    pub fn is_not_configured(&self) -> bool {
        !self.ok && self.detail == Self::NOT_CONFIGURED
    }
}
