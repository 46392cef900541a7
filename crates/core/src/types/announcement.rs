//! Announcement records.
//!
//! A [`Submission`] is what the requester fills in. Stamping it with the
//! requester and the approver channel yields an [`ApprovalRequest`], whose
//! [`Announcement`] travels inside the approver's interactive message until
//! a decision consumes it.

use serde::{Deserialize, Serialize};

use super::id::{ChannelId, UserId};

/// Announcement fields supplied by the requester.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Submission {
    /// Announcement title.
    pub title: String,
    /// Announcement body.
    #[serde(default)]
    pub details: String,
    /// Channels to broadcast to once approved.
    #[serde(default)]
    pub channels: Vec<ChannelId>,
}

impl Submission {
    /// Stamp the submission with its requester and the approver channel.
    ///
    /// This is the only mutation a submission ever sees.
    #[must_use]
    pub fn stamp(self, requester: UserId, approvers_channel: ChannelId) -> ApprovalRequest {
        let channel_string = channel_string(&self.channels);
        ApprovalRequest {
            channel: approvers_channel,
            announcement: Announcement {
                requester,
                title: self.title,
                details: self.details,
                channel_string,
                channels: self.channels,
            },
        }
    }
}

/// A stamped submission addressed to the approver channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    /// Approver channel the request is posted to.
    pub channel: ChannelId,
    /// The pending announcement.
    pub announcement: Announcement,
}

impl ApprovalRequest {
    /// User who asked for the announcement.
    #[must_use]
    pub const fn requester(&self) -> &UserId {
        &self.announcement.requester
    }
}

/// A pending announcement, carried opaquely through Slack.
///
/// Serialized with camelCase keys (`channelString`) because that is the
/// shape stored in button values by earlier deployments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    /// User who requested the announcement.
    pub requester: UserId,
    /// Announcement title.
    pub title: String,
    /// Announcement body.
    #[serde(default)]
    pub details: String,
    /// Human-readable target channel list, e.g. `<#C1>, <#C2>`.
    #[serde(default)]
    pub channel_string: String,
    /// Target channels.
    #[serde(default)]
    pub channels: Vec<ChannelId>,
}

/// Render channel IDs as Slack channel mentions joined by commas.
#[must_use]
pub fn channel_string(channels: &[ChannelId]) -> String {
    channels
        .iter()
        .map(|c| format!("<#{c}>"))
        .collect::<Vec<_>>()
        .join(", ")
}
