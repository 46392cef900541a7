//! List the channels the bot belongs to.
//!
//! # Environment Variables
//!
//! - `SLACK_ACCESS_TOKEN` - Slack bot token
//! - `APPROVERS_CHANNEL` - Approver channel ID
//! - `HERALD_MAX_PAGES` - Page limit (default: 100)

use herald_bot::config::SlackConfig;
use herald_bot::slack::list_member_channels;

use super::CommandError;

/// Print every member channel as `id name`.
pub async fn list() -> Result<(), CommandError> {
    let config = SlackConfig::from_env()?;
    let client = config.client(None);

    let channels = list_member_channels(&client, config.max_pages).await?;

    for channel in &channels {
        let marker = if channel.is_private { " (private)" } else { "" };
        tracing::info!(
            "{} {}{marker}",
            channel.id,
            channel.name.as_deref().unwrap_or("-")
        );
    }
    tracing::info!("{} channels", channels.len());

    Ok(())
}
