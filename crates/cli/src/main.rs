//! Fusion Food Lab CLI - Menu, messaging and waiter tools.
//!
//! # Usage
//!
//! ```bash
//! # Print the menu
//! fusion-cli menu
//!
//! # Send a test order to the restaurant's WhatsApp number
//! fusion-cli notify-test --text "1x Photon Lemonade (\$3.99)"
//!
//! # Chat with the waiter in the terminal
//! fusion-cli chat
//! ```
//!
//! # Commands
//!
//! - `menu` - Print the menu grouped by category
//! - `notify-test` - Send one order message through the dispatcher
//! - `chat` - Terminal session with the AI waiter and a local cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fusion-cli")]
#[command(author, version, about = "Fusion Food Lab CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the menu
    Menu,
    /// Send a test order message over WhatsApp
    NotifyTest {
        /// Order text to send
        #[arg(short, long, default_value = commands::notify::DEFAULT_TEST_ORDER)]
        text: String,

        /// Destination number in E.164 form (defaults to `RESTAURANT_WHATSAPP_NUMBER`)
        #[arg(long)]
        to: Option<String>,
    },
    /// Chat with the AI waiter in the terminal
    Chat,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Menu => commands::menu::print(),
        Commands::NotifyTest { text, to } => {
            commands::notify::send_test(&text, to.as_deref()).await?;
        }
        Commands::Chat => commands::chat::run().await?,
    }
    Ok(())
}
