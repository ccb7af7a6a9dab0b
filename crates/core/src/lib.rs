//! Fusion Food Lab Core - Domain library.
//!
//! This crate provides the ordering domain shared by every Fusion Food Lab
//! component:
//! - `storefront` - Web ordering site with the AI waiter
//! - `cli` - Terminal tools (menu listing, test notifications, terminal chat)
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no clocks except where a timestamp is passed in. This keeps it
//! lightweight and lets every invariant be tested in isolation.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, roles and WhatsApp addresses
//! - [`menu`] - The static menu catalog
//! - [`cart`] - The cart ledger
//! - [`order`] - Orders derived from a ledger and dispatch results
//! - [`marker`] - The `[ORDER_COMPLETE: ...]` completion marker scanner
//! - [`conversation`] - Role-tagged chat history
//! - [`session`] - Per-session state and the cart event table

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod conversation;
pub mod marker;
pub mod menu;
pub mod order;
pub mod session;
pub mod types;

pub use cart::{CartEntry, CartLedger};
pub use conversation::{Conversation, ConversationMessage};
pub use marker::{MarkerScan, find_order_marker, sanitize_marker_text, strip_order_marker};
pub use menu::{CatalogError, MenuCatalog, MenuCategory, MenuItem};
pub use order::{DispatchResult, Order, OrderLine};
pub use session::{CartEvent, Notice, NoticeLevel, OrderSession};
pub use types::*;
