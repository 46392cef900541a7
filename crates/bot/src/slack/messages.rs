//! Slack message builders for the announcement approval flow.
//!
//! Provides factory functions for building Block Kit payloads for:
//! - The request modal and parsing its submission
//! - The approver's interactive request message
//! - The rejection notice sent to the requester
//! - The broadcast announcement itself

use herald_core::{Announcement, ApprovalRequest, ChannelId, Decision, Submission, UserId};

use super::error::SlackError;
use super::types::{
    ActionElement, ApprovalMessage, Block, ButtonStyle, Channel, ContextElement, InputElement,
    PlainText, SelectOption, SlackMessage, Text, View, ViewPayload,
};

/// Callback ID of the announcement request modal.
pub const REQUEST_CALLBACK_ID: &str = "announcement_request";

/// Block and action IDs of the request modal inputs.
pub const TITLE_BLOCK: &str = "title";
pub const DETAILS_BLOCK: &str = "details";
pub const CHANNELS_BLOCK: &str = "channels";
const TITLE_ACTION: &str = "title_input";
const DETAILS_ACTION: &str = "details_input";
const CHANNELS_ACTION: &str = "channels_select";

/// Slack rejects button values longer than this.
pub const MAX_BUTTON_VALUE_LEN: usize = 2000;

/// Slack rejects static selects with more options than this.
pub const MAX_SELECT_OPTIONS: usize = 100;

/// Build the interactive approval request for the approver channel.
///
/// Both buttons carry the announcement as JSON in their `value`, so the
/// record comes back verbatim with whichever button the approver clicks.
///
/// # Errors
///
/// Returns [`SlackError::InvalidInput`] against the details block if the
/// announcement does not fit in a button value.
pub fn approval_request(request: &ApprovalRequest) -> Result<ApprovalMessage, SlackError> {
    let announcement = &request.announcement;
    let value = serde_json::to_string(announcement)
        .map_err(|e| SlackError::InvalidPayload(e.to_string()))?;

    if value.chars().count() > MAX_BUTTON_VALUE_LEN {
        return Err(SlackError::InvalidInput {
            block_id: DETAILS_BLOCK,
            reason: format!(
                "Announcement is too long ({} > {MAX_BUTTON_VALUE_LEN} characters)",
                value.chars().count()
            ),
        });
    }

    let blocks = vec![
        Block::Header {
            text: PlainText::new("📣 Announcement Request"),
        },
        Block::Section {
            text: Text::mrkdwn(format!("*{}*", announcement.title)),
        },
        Block::Section {
            text: Text::mrkdwn(details_or_placeholder(&announcement.details)),
        },
        Block::Context {
            elements: vec![ContextElement::Mrkdwn {
                text: format!(
                    "Requested by <@{}> • Channels: {}",
                    announcement.requester,
                    channels_or_none(&announcement.channel_string)
                ),
            }],
        },
        Block::Divider,
        Block::Actions {
            block_id: Some("announcement_decision".to_string()),
            elements: vec![
                ActionElement::Button {
                    text: PlainText::new("Approve"),
                    action_id: Decision::Approve.action_id().to_string(),
                    value: Some(value.clone()),
                    style: Some(ButtonStyle::Primary),
                },
                ActionElement::Button {
                    text: PlainText::new("Reject"),
                    action_id: Decision::Reject.action_id().to_string(),
                    value: Some(value),
                    style: Some(ButtonStyle::Danger),
                },
            ],
        },
    ];

    Ok(ApprovalMessage {
        channel: request.channel.clone(),
        requester: announcement.requester.clone(),
        text: format!(
            "<@{}> requested an announcement: {}",
            announcement.requester, announcement.title
        ),
        blocks,
    })
}

/// Build the direct message telling the requester their announcement was denied.
#[must_use]
pub fn rejection_notice(channel: ChannelId, announcement: &Announcement) -> SlackMessage {
    SlackMessage {
        channel,
        text: format!(
            "Your announcement request \"{}\" was not approved.",
            announcement.title
        ),
        blocks: vec![
            Block::Section {
                text: Text::mrkdwn(
                    "Sorry, your announcement request was not approved. Here is what you submitted:",
                ),
            },
            Block::Section {
                text: Text::mrkdwn(format!(
                    "*{}*\n{}",
                    announcement.title,
                    details_or_placeholder(&announcement.details)
                )),
            },
            Block::Context {
                elements: vec![ContextElement::Mrkdwn {
                    text: format!(
                        "Channels: {}",
                        channels_or_none(&announcement.channel_string)
                    ),
                }],
            },
        ],
    }
}

/// Build the approved announcement for one target channel.
#[must_use]
pub fn announcement(channel: ChannelId, announcement: &Announcement, approver: &UserId) -> SlackMessage {
    let mut blocks = vec![Block::Header {
        text: PlainText::new(announcement.title.clone()),
    }];

    if !announcement.details.is_empty() {
        blocks.push(Block::Section {
            text: Text::mrkdwn(announcement.details.clone()),
        });
    }

    blocks.push(Block::Context {
        elements: vec![ContextElement::Mrkdwn {
            text: format!(
                "Posted by <@{}> • Approved by <@{approver}>",
                announcement.requester
            ),
        }],
    });

    SlackMessage {
        channel,
        text: format!("📣 {}", announcement.title),
        blocks,
    }
}

/// Build the modal a requester fills in.
///
/// Offers at most [`MAX_SELECT_OPTIONS`] channels; archived channels are skipped.
#[must_use]
pub fn request_modal(channels: &[Channel]) -> View {
    let options = channels
        .iter()
        .filter(|c| !c.is_archived)
        .take(MAX_SELECT_OPTIONS)
        .map(|c| SelectOption {
            text: PlainText::new(channel_label(c)),
            value: c.id.to_string(),
        })
        .collect();

    View {
        view_type: "modal",
        callback_id: REQUEST_CALLBACK_ID.to_string(),
        title: PlainText::new("Request announcement"),
        submit: PlainText::new("Submit"),
        close: PlainText::new("Cancel"),
        blocks: vec![
            Block::Input {
                block_id: TITLE_BLOCK.to_string(),
                label: PlainText::new("Title"),
                element: InputElement::PlainTextInput {
                    action_id: TITLE_ACTION.to_string(),
                    multiline: false,
                    max_length: Some(150),
                },
                optional: false,
            },
            Block::Input {
                block_id: DETAILS_BLOCK.to_string(),
                label: PlainText::new("Details"),
                element: InputElement::PlainTextInput {
                    action_id: DETAILS_ACTION.to_string(),
                    multiline: true,
                    max_length: None,
                },
                optional: true,
            },
            Block::Input {
                block_id: CHANNELS_BLOCK.to_string(),
                label: PlainText::new("Channels"),
                element: InputElement::MultiStaticSelect {
                    action_id: CHANNELS_ACTION.to_string(),
                    placeholder: PlainText::new("Where should this be announced?"),
                    options,
                },
                optional: false,
            },
        ],
    }
}

/// Read a submitted request modal back into a [`Submission`].
///
/// # Errors
///
/// Returns [`SlackError::InvalidInput`] naming the title block if the title
/// is blank, or the channels block if no channel was selected.
pub fn submission_from_view(view: &ViewPayload) -> Result<Submission, SlackError> {
    let title = view
        .state
        .get(TITLE_BLOCK, TITLE_ACTION)
        .and_then(|v| v.value.as_deref())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| SlackError::InvalidInput {
            block_id: TITLE_BLOCK,
            reason: "Please enter a title".to_string(),
        })?
        .to_string();

    let details = view
        .state
        .get(DETAILS_BLOCK, DETAILS_ACTION)
        .and_then(|v| v.value.as_deref())
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    let channels: Vec<ChannelId> = view
        .state
        .get(CHANNELS_BLOCK, CHANNELS_ACTION)
        .map(|v| {
            v.selected_options
                .iter()
                .map(|o| ChannelId::new(o.value.as_str()))
                .collect()
        })
        .unwrap_or_default();

    if channels.is_empty() {
        return Err(SlackError::InvalidInput {
            block_id: CHANNELS_BLOCK,
            reason: "Select at least one channel".to_string(),
        });
    }

    Ok(Submission {
        title,
        details,
        channels,
    })
}

fn channel_label(channel: &Channel) -> String {
    match &channel.name {
        Some(name) if channel.is_private => format!("🔒 {name}"),
        Some(name) => format!("#{name}"),
        None => channel.id.to_string(),
    }
}

fn details_or_placeholder(details: &str) -> String {
    if details.is_empty() {
        "_No details provided._".to_string()
    } else {
        details.to_string()
    }
}

fn channels_or_none(channel_string: &str) -> &str {
    if channel_string.is_empty() {
        "none"
    } else {
        channel_string
    }
}
