//! Application state shared across handlers.

use std::sync::Arc;

use herald_core::ChannelId;

use crate::config::BotConfig;
use crate::services::AnnouncementService;
use crate::slack::SlackClient;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    slack: SlackClient,
    announcements: AnnouncementService<SlackClient>,
    max_pages: usize,
}

impl AppState {
    /// Create state from a Slack client.
    ///
    /// The client must carry a signing secret for webhooks to verify.
    #[must_use]
    pub fn new(slack: SlackClient, approvers_channel: ChannelId, max_pages: usize) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                announcements: AnnouncementService::new(slack.clone(), approvers_channel),
                slack,
                max_pages,
            }),
        }
    }

    /// Create state from the loaded server configuration.
    #[must_use]
    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(
            config.client(),
            config.slack.approvers_channel.clone(),
            config.slack.max_pages,
        )
    }

    /// Slack Web API client.
    #[must_use]
    pub fn slack(&self) -> &SlackClient {
        &self.inner.slack
    }

    /// Announcement workflow.
    #[must_use]
    pub fn announcements(&self) -> &AnnouncementService<SlackClient> {
        &self.inner.announcements
    }

    /// Page limit when listing channels.
    #[must_use]
    pub fn max_pages(&self) -> usize {
        self.inner.max_pages
    }
}
