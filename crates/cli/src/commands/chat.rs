//! Terminal chat with the AI waiter.
//!
//! Runs one guest session on stdin/stdout with the same waiter, cart and
//! dispatch rules as the web page. Lines starting with `/` are local
//! commands; anything else goes to the waiter.

use std::io::Write as _;

use fusion_core::{CartEvent, MenuItemId, Notice, NoticeLevel, Order, OrderSession};
use fusion_storefront::config::FusionConfig;
use fusion_storefront::routes::checkout::{CHECKOUT_SUCCESS, EMPTY_CART};
use fusion_storefront::state::AppState;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::CommandError;

const HELP: &str = "Commands: /add <id> [qty], /remove <id>, /cart, /checkout, /reset, /help, /quit";

/// One line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Add { item_id: MenuItemId, quantity: u32 },
    Remove { item_id: MenuItemId },
    Cart,
    Checkout,
    Reset,
    Help,
    Quit,
    /// Text for the waiter.
    Say(String),
    /// A command that could not be parsed, with the reason.
    Invalid(String),
}

impl ChatCommand {
    /// Parse one input line.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(command) = line.strip_prefix('/') else {
            return Self::Say(line.to_string());
        };

        let mut parts = command.split_whitespace();
        match parts.next().unwrap_or_default() {
            "add" => {
                let Some(item_id) = parts.next().and_then(|id| id.parse().ok()) else {
                    return Self::Invalid("usage: /add <id> [qty]".to_string());
                };
                match parts.next().map(str::parse::<u32>) {
                    None => Self::Add {
                        item_id,
                        quantity: 1,
                    },
                    Some(Ok(quantity)) if quantity > 0 => Self::Add { item_id, quantity },
                    Some(_) => Self::Invalid("quantity must be a positive number".to_string()),
                }
            }
            "remove" => parts
                .next()
                .and_then(|id| id.parse().ok())
                .map_or_else(
                    || Self::Invalid("usage: /remove <id>".to_string()),
                    |item_id| Self::Remove { item_id },
                ),
            "cart" => Self::Cart,
            "checkout" => Self::Checkout,
            "reset" => Self::Reset,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => Self::Invalid(format!("unknown command /{other}")),
        }
    }
}

/// Run the interactive chat until `/quit` or end of input.
///
/// # Errors
///
/// Returns an error if configuration is invalid or stdin cannot be read.
#[allow(clippy::print_stdout)]
pub async fn run() -> Result<(), CommandError> {
    let state = AppState::new(FusionConfig::from_env()?)?;
    let waiter = state.waiter();
    let mut session = OrderSession::new();

    if waiter.is_enabled() {
        waiter.ensure_started(&mut session);
        if let Some(greeting) = session.conversation.last() {
            println!("waiter> {}", greeting.content);
        }
    } else {
        println!("Chat is disabled (set GEMINI_API_KEY); cart commands still work.");
    }
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match ChatCommand::parse(&line) {
            ChatCommand::Quit => break,
            ChatCommand::Help => println!("{HELP}"),
            ChatCommand::Invalid(reason) => println!("{reason}"),
            ChatCommand::Cart => print_cart(&state, &session),
            ChatCommand::Reset => {
                session = OrderSession::new();
                waiter.ensure_started(&mut session);
                println!("Cart and conversation cleared.");
            }
            ChatCommand::Add { item_id, quantity } => {
                let event = CartEvent::Add {
                    item_id,
                    delta: i64::from(quantity),
                };
                match session.apply(event, state.catalog()) {
                    Ok(()) => print_cart(&state, &session),
                    Err(e) => println!("{e}"),
                }
            }
            ChatCommand::Remove { item_id } => {
                match session.apply(CartEvent::Remove { item_id }, state.catalog()) {
                    Ok(()) => print_cart(&state, &session),
                    Err(e) => println!("{e}"),
                }
            }
            ChatCommand::Checkout => {
                match Order::from_ledger(&session.cart, state.catalog().currency()) {
                    Some(order) => {
                        let result = state.dispatcher().dispatch(&order.to_text()).await;
                        session.complete_dispatch(&result, CHECKOUT_SUCCESS);
                    }
                    None => session.notice = Some(Notice::info(EMPTY_CART)),
                }
            }
            ChatCommand::Say(text) => match waiter.reply(&mut session, &text).await {
                Ok(Some(reply)) => println!("waiter> {}", reply.text),
                Ok(None) => {}
                Err(e) => println!("{e}"),
            },
        }

        if let Some(notice) = session.take_notice() {
            print_notice(&notice);
        }
    }

    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_cart(state: &AppState, session: &OrderSession) {
    let catalog = state.catalog();
    if session.cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }
    for entry in session.cart.entries() {
        println!(
            "  [{}] {}x {} = {}",
            entry.item.id,
            entry.quantity,
            entry.item.name,
            catalog.price(entry.line_total()).display()
        );
    }
    println!("  Total: {}", catalog.price(session.cart.total()).display());
}

#[allow(clippy::print_stdout)]
fn print_notice(notice: &Notice) {
    let label = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Info => "info",
        NoticeLevel::Error => "error",
    };
    println!("[{label}] {}", notice.text);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_goes_to_waiter() {
        assert_eq!(
            ChatCommand::parse("  two burgers please "),
            ChatCommand::Say("two burgers please".to_string())
        );
    }

    #[test]
    fn test_add_with_and_without_quantity() {
        assert_eq!(
            ChatCommand::parse("/add 3"),
            ChatCommand::Add {
                item_id: MenuItemId::new(3),
                quantity: 1
            }
        );
        assert_eq!(
            ChatCommand::parse("/add 1 4"),
            ChatCommand::Add {
                item_id: MenuItemId::new(1),
                quantity: 4
            }
        );
    }

    #[test]
    fn test_invalid_commands() {
        assert!(matches!(ChatCommand::parse("/add"), ChatCommand::Invalid(_)));
        assert!(matches!(ChatCommand::parse("/add x"), ChatCommand::Invalid(_)));
        assert!(matches!(ChatCommand::parse("/add 1 0"), ChatCommand::Invalid(_)));
        assert!(matches!(ChatCommand::parse("/remove"), ChatCommand::Invalid(_)));
        assert!(matches!(ChatCommand::parse("/dance"), ChatCommand::Invalid(_)));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(
            ChatCommand::parse("/remove 2"),
            ChatCommand::Remove {
                item_id: MenuItemId::new(2)
            }
        );
        assert_eq!(ChatCommand::parse("/cart"), ChatCommand::Cart);
        assert_eq!(ChatCommand::parse("/checkout"), ChatCommand::Checkout);
        assert_eq!(ChatCommand::parse("/reset"), ChatCommand::Reset);
        assert_eq!(ChatCommand::parse("/quit"), ChatCommand::Quit);
        assert_eq!(ChatCommand::parse("/exit"), ChatCommand::Quit);
    }
}
