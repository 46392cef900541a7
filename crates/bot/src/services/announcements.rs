//! Announcement workflow.
//!
//! Three independent operations, each a short fixed sequence of Slack calls:
//! 1. `request_announcement` posts the interactive request to approvers
//! 2. `reject_announcement` closes the request and DMs the requester
//! 3. `post_announcement` closes the request and broadcasts to every target channel
//!
//! Nothing is stored between steps. A failure part-way through leaves
//! whatever already succeeded in Slack.

use futures::future::join_all;
use herald_core::{Announcement, ChannelId, MessageTs, Submission, UserId};
use tracing::{info, instrument, warn};

use crate::slack::{
    MessageOrigin, SlackError, SlackTransport, UpdateMessage, announcement as broadcast_message,
    approval_request, rejection_notice,
};

/// Replacement text for a rejected request.
pub const REJECTED_TEXT: &str = "This request has been denied. I am letting the requester know!";

/// Replacement text for an approved request.
pub const APPROVED_TEXT: &str = "Thanks! This post has been announced.";

/// Outcome of broadcasting an approved announcement.
#[derive(Debug, Default)]
pub struct BroadcastReport {
    /// Channels the announcement was posted to.
    pub delivered: Vec<ChannelId>,
    /// Channels the post failed for, with the reason.
    pub failed: Vec<(ChannelId, SlackError)>,
}

impl BroadcastReport {
    /// Whether every target channel received the announcement.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Drives announcement requests through the approver channel.
#[derive(Debug, Clone)]
pub struct AnnouncementService<T> {
    slack: T,
    approvers_channel: ChannelId,
}

impl<T: SlackTransport> AnnouncementService<T> {
    /// Create a new announcement service.
    #[must_use]
    pub const fn new(slack: T, approvers_channel: ChannelId) -> Self {
        Self {
            slack,
            approvers_channel,
        }
    }

    /// Channel that receives pending requests.
    #[must_use]
    pub const fn approvers_channel(&self) -> &ChannelId {
        &self.approvers_channel
    }

    /// Post a new request to the approver channel.
    ///
    /// Returns the timestamp of the posted request, when Slack reports one.
    ///
    /// # Errors
    ///
    /// Returns error if the announcement cannot be formatted or the post fails.
    #[instrument(skip(self, requester, submission), fields(requester = %requester))]
    pub async fn request_announcement(
        &self,
        requester: &UserId,
        submission: Submission,
    ) -> Result<Option<MessageTs>, SlackError> {
        let request = submission.stamp(requester.clone(), self.approvers_channel.clone());
        let message = approval_request(&request)?;

        let response = self.slack.post_message(&message).await?;

        info!(
            channel = %self.approvers_channel,
            title = %request.announcement.title,
            "Announcement request posted"
        );

        Ok(response.ts)
    }

    /// Deny a request: close the approver's message, then tell the requester.
    ///
    /// # Errors
    ///
    /// Returns the first failing step. Earlier steps are not undone.
    #[instrument(skip(self, origin, announcement), fields(channel = %origin.channel, ts = %origin.ts))]
    pub async fn reject_announcement(
        &self,
        origin: &MessageOrigin,
        announcement: &Announcement,
    ) -> Result<(), SlackError> {
        self.close_request(origin, REJECTED_TEXT).await?;

        let dm = self.slack.open_conversation(&announcement.requester).await?;
        self.slack
            .post_message(&rejection_notice(dm, announcement))
            .await?;

        info!(
            requester = %announcement.requester,
            approver = %origin.user,
            "Announcement rejected"
        );

        Ok(())
    }

    /// Approve a request: close the approver's message, then post the
    /// announcement to every target channel concurrently.
    ///
    /// Every channel is attempted. Per-channel failures are collected in the
    /// returned [`BroadcastReport`].
    ///
    /// # Errors
    ///
    /// Returns error only if closing the approver's message fails, in which
    /// case nothing is broadcast.
    #[instrument(skip(self, origin, announcement), fields(channel = %origin.channel, ts = %origin.ts))]
    pub async fn post_announcement(
        &self,
        origin: &MessageOrigin,
        announcement: &Announcement,
    ) -> Result<BroadcastReport, SlackError> {
        self.close_request(origin, APPROVED_TEXT).await?;

        let posts = announcement.channels.iter().map(|channel| async move {
            let message = broadcast_message(channel.clone(), announcement, &origin.user);
            let result = self.slack.post_message(&message).await;
            (channel.clone(), result)
        });

        let mut report = BroadcastReport::default();
        for (channel, result) in join_all(posts).await {
            match result {
                Ok(_) => report.delivered.push(channel),
                Err(e) => {
                    warn!(channel = %channel, error = %e, "Failed to post announcement");
                    report.failed.push((channel, e));
                }
            }
        }

        info!(
            delivered = report.delivered.len(),
            failed = report.failed.len(),
            approver = %origin.user,
            "Announcement broadcast"
        );

        Ok(report)
    }

    /// Replace the approver's message with `text`, dropping its buttons.
    async fn close_request(&self, origin: &MessageOrigin, text: &str) -> Result<(), SlackError> {
        self.slack
            .update_message(&UpdateMessage {
                channel: origin.channel.clone(),
                ts: origin.ts.clone(),
                text: text.to_string(),
                blocks: None,
            })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::slack::testing::RecordingTransport;
    use serde_json::json;

    fn service(transport: &RecordingTransport) -> AnnouncementService<&RecordingTransport> {
        AnnouncementService::new(transport, ChannelId::new("CAPPROVE"))
    }

    fn origin() -> MessageOrigin {
        MessageOrigin {
            channel: ChannelId::new("CAPPROVE"),
            ts: MessageTs::new("1700000000.000100"),
            user: UserId::new("UAPPROVER"),
        }
    }

    fn pending(channels: &[&str]) -> Announcement {
        Submission {
            title: "Office closed Friday".to_string(),
            details: "Building maintenance.".to_string(),
            channels: channels.iter().map(|c| ChannelId::new(*c)).collect(),
        }
        .stamp(UserId::new("U1"), ChannelId::new("CAPPROVE"))
        .announcement
    }

    #[tokio::test]
    async fn test_request_posts_once_to_approvers() {
        let transport = RecordingTransport::new();
        transport.respond(
            "chat.postMessage",
            json!({"ok": true, "channel": "CAPPROVE", "ts": "1.1"}),
        );

        let ts = service(&transport)
            .request_announcement(
                &UserId::new("U1"),
                Submission {
                    title: "T".to_string(),
                    ..Submission::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(ts, Some(MessageTs::new("1.1")));
        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "chat.postMessage");
        assert_eq!(calls[0].payload["channel"], "CAPPROVE");
        assert_eq!(calls[0].payload["requester"], "U1");
    }

    #[tokio::test]
    async fn test_request_surfaces_api_error() {
        let transport = RecordingTransport::new();
        transport.respond(
            "chat.postMessage",
            json!({"ok": false, "error": "channel_not_found"}),
        );

        let result = service(&transport)
            .request_announcement(&UserId::new("U1"), Submission::default())
            .await;

        assert!(matches!(result, Err(SlackError::Api { .. })));
    }

    #[tokio::test]
    async fn test_reject_runs_three_steps_in_order() {
        let transport = RecordingTransport::new();
        transport.respond(
            "conversations.open",
            json!({"ok": true, "channel": {"id": "DREQ"}}),
        );

        service(&transport)
            .reject_announcement(&origin(), &pending(&["C1"]))
            .await
            .unwrap();

        assert_eq!(
            transport.methods(),
            vec!["chat.update", "conversations.open", "chat.postMessage"]
        );

        let calls = transport.calls();
        assert_eq!(calls[0].payload["channel"], "CAPPROVE");
        assert_eq!(calls[0].payload["ts"], "1700000000.000100");
        assert_eq!(calls[0].payload["text"], REJECTED_TEXT);
        assert!(calls[0].payload["blocks"].is_null());
        assert_eq!(calls[1].payload["users"], "U1");
        assert_eq!(calls[2].payload["channel"], "DREQ");
    }

    #[tokio::test]
    async fn test_reject_stops_when_update_fails() {
        let transport = RecordingTransport::new();
        transport.fail("chat.update", SlackError::Request("connection reset".into()));

        let result = service(&transport)
            .reject_announcement(&origin(), &pending(&["C1"]))
            .await;

        assert!(matches!(result, Err(SlackError::Request(_))));
        assert_eq!(transport.methods(), vec!["chat.update"]);
    }

    #[tokio::test]
    async fn test_reject_without_dm_channel() {
        let transport = RecordingTransport::new();
        transport.respond("conversations.open", json!({"ok": true}));

        let result = service(&transport)
            .reject_announcement(&origin(), &pending(&["C1"]))
            .await;

        assert!(matches!(result, Err(SlackError::Response(_))));
        assert_eq!(transport.methods(), vec!["chat.update", "conversations.open"]);
    }

    #[tokio::test]
    async fn test_post_updates_then_posts_per_channel() {
        let transport = RecordingTransport::new();
        let announcement = pending(&["C1", "C2"]);

        let report = service(&transport)
            .post_announcement(&origin(), &announcement)
            .await
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(
            report.delivered,
            vec![ChannelId::new("C1"), ChannelId::new("C2")]
        );

        let calls = transport.calls();
        assert_eq!(
            transport.methods(),
            vec!["chat.update", "chat.postMessage", "chat.postMessage"]
        );
        assert_eq!(calls[0].payload["text"], APPROVED_TEXT);

        let mut targets = Vec::new();
        for call in &calls[1..] {
            targets.push(call.payload["channel"].as_str().unwrap().to_string());
            let rendered = call.payload["blocks"].to_string();
            assert!(rendered.contains("Office closed Friday"));
            assert!(rendered.contains("Building maintenance."));
            assert!(rendered.contains("<@U1>"));
            assert!(rendered.contains("<@UAPPROVER>"));
        }
        targets.sort();
        assert_eq!(targets, vec!["C1", "C2"]);
    }

    #[tokio::test]
    async fn test_post_collects_partial_failures() {
        let transport = RecordingTransport::new();
        transport.respond("chat.postMessage", json!({"ok": false, "error": "not_in_channel"}));
        transport.respond("chat.postMessage", json!({"ok": true, "ts": "2.2"}));

        let report = service(&transport)
            .post_announcement(&origin(), &pending(&["C1", "C2"]))
            .await
            .unwrap();

        assert!(!report.is_complete());
        assert_eq!(report.delivered, vec![ChannelId::new("C2")]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, ChannelId::new("C1"));
    }

    #[tokio::test]
    async fn test_post_skips_broadcast_when_update_fails() {
        let transport = RecordingTransport::new();
        transport.respond("chat.update", json!({"ok": false, "error": "message_not_found"}));

        let result = service(&transport)
            .post_announcement(&origin(), &pending(&["C1", "C2"]))
            .await;

        assert!(matches!(result, Err(SlackError::Api { .. })));
        assert_eq!(transport.methods(), vec!["chat.update"]);
    }
}
