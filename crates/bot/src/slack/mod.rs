//! Slack integration for announcement approvals.
//!
//! This module provides:
//! - [`SlackTransport`], the seam for authenticated Web API calls, and
//!   [`SlackClient`], its reqwest implementation
//! - Paginated channel listing
//! - Block Kit types and message builders
//! - Webhook signature verification
//!
//! # Flow
//!
//! 1. A user runs the slash command and gets the request modal
//! 2. The submitted request is posted to the approver channel with buttons
//! 3. An approver clicks Approve or Reject
//! 4. The webhook handler verifies the signature and decodes the interaction
//! 5. The announcement is broadcast, or the requester is told it was denied

mod channels;
mod client;
mod error;
mod messages;
#[cfg(test)]
pub(crate) mod testing;
mod types;

pub use channels::{DEFAULT_MAX_PAGES, list_member_channels, list_selectable_channels};
pub use client::{SLACK_API_BASE, SlackClient, SlackTransport, build_query, check_ok, decode};
pub use error::SlackError;
pub use messages::{
    CHANNELS_BLOCK, DETAILS_BLOCK, MAX_BUTTON_VALUE_LEN, MAX_SELECT_OPTIONS, REQUEST_CALLBACK_ID,
    TITLE_BLOCK, announcement, approval_request, rejection_notice, request_modal,
    submission_from_view,
};
pub use types::{
    ActionElement, ApprovalMessage, AuthTestResponse, Block, ButtonStyle, Channel,
    ContextElement, InputElement, InteractionAction, InteractionPayload, InteractionUser,
    MessageOrigin, PlainText, PostMessageResponse, SelectOption, SlackMessage, SlashCommand, Text,
    UpdateMessage, View, ViewPayload,
};
