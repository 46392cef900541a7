//! Check the bot token with `auth.test`.

use herald_bot::config::SlackConfig;
use herald_bot::slack::SlackTransport;

use super::CommandError;

/// Report which bot and workspace the configured token belongs to.
pub async fn ping() -> Result<(), CommandError> {
    let config = SlackConfig::from_env()?;
    let identity = config.client(None).auth_test().await?;

    tracing::info!(
        "Authenticated as {} ({}) in {} {}",
        identity.user.as_deref().unwrap_or("unknown"),
        identity.user_id,
        identity.team.as_deref().unwrap_or("unknown workspace"),
        identity.url.as_deref().unwrap_or_default()
    );

    Ok(())
}
