//! CLI command implementations.

pub mod announce;
pub mod channels;
pub mod ping;

use herald_bot::config::ConfigError;
use herald_bot::slack::SlackError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Environment configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Slack call failed.
    #[error(transparent)]
    Slack(#[from] SlackError),
}
