//! Business logic services for storefront.
//!
//! # Services
//!
//! - `dispatch` - Formats orders and sends them to the restaurant over WhatsApp
//! - `waiter` - The AI waiter chat, including order completion

pub mod dispatch;
pub mod waiter;

pub use dispatch::OrderDispatcher;
pub use waiter::{WaiterError, WaiterReply, WaiterService, seed_conversation};
