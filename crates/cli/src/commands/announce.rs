//! Request an announcement from the command line.

use herald_bot::config::SlackConfig;
use herald_bot::services::AnnouncementService;
use herald_core::{ChannelId, Submission, UserId};

use super::CommandError;

/// Post an announcement request to the approver channel on behalf of `requester`.
pub async fn request(
    requester: &str,
    title: String,
    details: String,
    channels: Vec<String>,
) -> Result<(), CommandError> {
    let config = SlackConfig::from_env()?;
    let service = AnnouncementService::new(config.client(None), config.approvers_channel.clone());

    let submission = Submission {
        title,
        details,
        channels: channels.into_iter().map(ChannelId::from).collect(),
    };

    let ts = service
        .request_announcement(&UserId::new(requester), submission)
        .await?;

    tracing::info!(
        "Request posted to {} (ts {})",
        config.approvers_channel,
        ts.as_ref().map_or("unknown", |ts| ts.as_str())
    );

    Ok(())
}
