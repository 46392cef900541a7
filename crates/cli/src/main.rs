//! Herald CLI - operator tools for the announcement bot.
//!
//! # Usage
//!
//! ```bash
//! # List the channels the bot belongs to
//! herald channels
//!
//! # Send an announcement request to the approver channel
//! herald announce -r U0123 -t "Office closed Friday" -d "Building maintenance." -c C01 -c C02
//!
//! # Check the bot token
//! herald ping
//! ```
//!
//! # Commands
//!
//! - `channels` - List member channels (follows pagination)
//! - `announce` - Request an announcement on behalf of a user
//! - `ping` - Identify the bot with `auth.test`

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "herald")]
#[command(author, version, about = "Herald announcement bot tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the channels the bot is a member of
    Channels,
    /// Send an announcement request to the approver channel
    Announce {
        /// Slack user ID of the requester
        #[arg(short, long)]
        requester: String,

        /// Announcement title
        #[arg(short, long)]
        title: String,

        /// Announcement body
        #[arg(short, long, default_value = "")]
        details: String,

        /// Target channel ID (repeatable)
        #[arg(short, long = "channel", required = true)]
        channels: Vec<String>,
    },
    /// Check the bot token against Slack
    Ping,
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
        Commands::Channels => commands::channels::list().await?,
        Commands::Announce {
            requester,
            title,
            details,
            channels,
        } => {
            commands::announce::request(&requester, title, details, channels).await?;
        }
        Commands::Ping => commands::ping::ping().await?,
    }
    Ok(())
}
