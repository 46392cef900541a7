//! Slack Block Kit and Web API types.
//!
//! These types represent the subset of Block Kit, the Web API responses,
//! and the interactivity payloads that the announcement flow needs.
//!
//! See: <https://api.slack.com/block-kit>

use std::collections::HashMap;

use herald_core::{ChannelId, MessageTs, UserId};
use serde::{Deserialize, Serialize};

use super::error::SlackError;

// =============================================================================
// Outgoing Messages
// =============================================================================

/// A Slack message with blocks.
#[derive(Debug, Clone, Serialize)]
pub struct SlackMessage {
    /// Channel ID to post to.
    pub channel: ChannelId,
    /// Plain text fallback (notifications, screen readers).
    pub text: String,
    /// Message blocks.
    pub blocks: Vec<Block>,
}

/// The interactive approval request posted to the approver channel.
///
/// `requester` rides along at the top level of the body next to `channel`;
/// Slack ignores arguments it does not know.
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalMessage {
    /// Approver channel.
    pub channel: ChannelId,
    /// User who asked for the announcement.
    pub requester: UserId,
    /// Plain text fallback.
    pub text: String,
    /// Message blocks, including the approve/reject buttons.
    pub blocks: Vec<Block>,
}

/// Body of a `chat.update` call.
///
/// `blocks: None` serializes as `null`, which strips the original blocks
/// (and with them the buttons) from the message.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateMessage {
    /// Channel containing the message.
    pub channel: ChannelId,
    /// Timestamp of the message to edit.
    pub ts: MessageTs,
    /// Replacement text.
    pub text: String,
    /// Replacement blocks.
    pub blocks: Option<Vec<Block>>,
}

// =============================================================================
// Block Kit
// =============================================================================

/// Block Kit block types.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Header block with large text.
    Header { text: PlainText },
    /// Section block with text.
    Section { text: Text },
    /// Context block with small muted text.
    Context { elements: Vec<ContextElement> },
    /// Actions block with interactive elements.
    Actions {
        #[serde(skip_serializing_if = "Option::is_none")]
        block_id: Option<String>,
        elements: Vec<ActionElement>,
    },
    /// Input block (modals only).
    Input {
        block_id: String,
        label: PlainText,
        element: InputElement,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        optional: bool,
    },
    /// Divider block (horizontal line).
    Divider,
}

/// Text object types.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Text {
    /// Plain text (no formatting).
    PlainText { text: String, emoji: bool },
    /// Markdown text (supports formatting).
    Mrkdwn { text: String },
}

impl Text {
    /// Create a plain text object.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::PlainText {
            text: text.into(),
            emoji: true,
        }
    }

    /// Create a markdown text object.
    #[must_use]
    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self::Mrkdwn { text: text.into() }
    }
}

/// Plain text object (for headers, labels, and buttons).
#[derive(Debug, Clone, Serialize)]
pub struct PlainText {
    #[serde(rename = "type")]
    pub text_type: &'static str,
    pub text: String,
    pub emoji: bool,
}

impl PlainText {
    /// Create a new plain text object.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text_type: "plain_text",
            text: text.into(),
            emoji: true,
        }
    }
}

/// Context block elements.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContextElement {
    /// Markdown text in context.
    Mrkdwn { text: String },
}

/// Action block elements.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionElement {
    /// Interactive button.
    Button {
        text: PlainText,
        action_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        style: Option<ButtonStyle>,
    },
}

/// Button style (affects color).
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    /// Green primary button.
    Primary,
    /// Red danger button.
    Danger,
}

/// Input block elements.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputElement {
    /// Free text input.
    PlainTextInput {
        action_id: String,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        multiline: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_length: Option<u32>,
    },
    /// Multi-select over a fixed option list.
    MultiStaticSelect {
        action_id: String,
        placeholder: PlainText,
        options: Vec<SelectOption>,
    },
}

/// Option of a static select menu.
#[derive(Debug, Clone, Serialize)]
pub struct SelectOption {
    pub text: PlainText,
    pub value: String,
}

/// Modal view opened with `views.open`.
#[derive(Debug, Clone, Serialize)]
pub struct View {
    #[serde(rename = "type")]
    pub view_type: &'static str,
    pub callback_id: String,
    pub title: PlainText,
    pub submit: PlainText,
    pub close: PlainText,
    pub blocks: Vec<Block>,
}

// =============================================================================
// Response Types
// =============================================================================

/// Response from posting a message.
#[derive(Debug, Clone, Deserialize)]
pub struct PostMessageResponse {
    /// Whether the request was successful.
    pub ok: bool,
    /// Channel ID where message was posted.
    #[serde(default)]
    pub channel: Option<ChannelId>,
    /// Message timestamp (unique ID).
    #[serde(default)]
    pub ts: Option<MessageTs>,
    /// Error message if not ok.
    #[serde(default)]
    pub error: Option<String>,
}

/// Response from `conversations.open`.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenConversationResponse {
    /// The opened (or reused) conversation.
    #[serde(default)]
    pub channel: Option<ConversationRef>,
}

/// Minimal conversation reference.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationRef {
    /// Conversation ID.
    pub id: ChannelId,
}

/// One page of `users.conversations`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationsPage {
    /// Conversations on this page.
    #[serde(default)]
    pub channels: Vec<Channel>,
    /// Pagination metadata.
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

impl ConversationsPage {
    /// Cursor for the next page, if the listing continues.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        self.response_metadata
            .as_ref()
            .and_then(|m| m.next_cursor.as_deref())
            .filter(|c| !c.is_empty())
    }
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMetadata {
    /// Opaque cursor; empty or absent on the last page.
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A conversation the bot belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Channel {
    /// Channel ID.
    pub id: ChannelId,
    /// Channel name (absent for direct messages).
    #[serde(default)]
    pub name: Option<String>,
    /// Whether the channel is private.
    #[serde(default)]
    pub is_private: bool,
    /// Whether the channel is archived.
    #[serde(default)]
    pub is_archived: bool,
}

/// Response from `auth.test`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthTestResponse {
    /// Bot user ID.
    pub user_id: UserId,
    /// Bot user name.
    #[serde(default)]
    pub user: Option<String>,
    /// Workspace name.
    #[serde(default)]
    pub team: Option<String>,
    /// Workspace URL.
    #[serde(default)]
    pub url: Option<String>,
}

// =============================================================================
// Inbound Payloads
// =============================================================================

/// Slash command invocation (form-encoded body).
#[derive(Debug, Clone)]
pub struct SlashCommand {
    /// Command name, e.g. `/announce`.
    pub command: String,
    /// Invoking user.
    pub user_id: UserId,
    /// Trigger for opening a modal (valid for 3 seconds).
    pub trigger_id: String,
}

impl SlashCommand {
    /// Parse a slash command from its `application/x-www-form-urlencoded` body.
    ///
    /// # Errors
    ///
    /// Returns [`SlackError::InvalidPayload`] if `user_id` or `trigger_id` is missing.
    pub fn from_form(body: &str) -> Result<Self, SlackError> {
        let fields: HashMap<String, String> = url::form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect();

        let required = |key: &str| {
            fields
                .get(key)
                .cloned()
                .ok_or_else(|| SlackError::InvalidPayload(format!("missing {key}")))
        };

        Ok(Self {
            command: fields.get("command").cloned().unwrap_or_default(),
            user_id: UserId::new(required("user_id")?),
            trigger_id: required("trigger_id")?,
        })
    }
}

/// Slack interaction payload (button clicks and modal submissions).
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionPayload {
    /// Type of interaction (`block_actions`, `view_submission`, ...).
    #[serde(rename = "type")]
    pub interaction_type: String,
    /// User who triggered the interaction.
    pub user: InteractionUser,
    /// Container information.
    #[serde(default)]
    pub container: Option<InteractionContainer>,
    /// Channel where interaction occurred.
    #[serde(default)]
    pub channel: Option<InteractionChannel>,
    /// Message the clicked button belongs to.
    #[serde(default)]
    pub message: Option<InteractionMessage>,
    /// Actions that were triggered.
    #[serde(default)]
    pub actions: Vec<InteractionAction>,
    /// Submitted modal, for `view_submission`.
    #[serde(default)]
    pub view: Option<ViewPayload>,
}

impl InteractionPayload {
    /// Locate the message that was clicked and the user who clicked it.
    ///
    /// # Errors
    ///
    /// Returns [`SlackError::InvalidPayload`] if the channel or message
    /// timestamp is absent.
    pub fn origin(&self) -> Result<MessageOrigin, SlackError> {
        let channel = self
            .channel
            .as_ref()
            .map(|c| c.id.clone())
            .or_else(|| self.container.as_ref().and_then(|c| c.channel_id.clone()))
            .ok_or_else(|| SlackError::InvalidPayload("missing channel.id".to_string()))?;

        let ts = self
            .message
            .as_ref()
            .map(|m| m.ts.clone())
            .or_else(|| self.container.as_ref().and_then(|c| c.message_ts.clone()))
            .ok_or_else(|| SlackError::InvalidPayload("missing message.ts".to_string()))?;

        Ok(MessageOrigin {
            channel,
            ts,
            user: self.user.id.clone(),
        })
    }
}

/// The approver's message and the approver who acted on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageOrigin {
    /// Channel holding the approval request.
    pub channel: ChannelId,
    /// Timestamp of the approval request.
    pub ts: MessageTs,
    /// Approver who clicked.
    pub user: UserId,
}

/// User who triggered an interaction.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionUser {
    /// Slack user ID.
    pub id: UserId,
    /// Username.
    #[serde(default)]
    pub username: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Container for the interaction.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionContainer {
    /// Container type (e.g., "message").
    #[serde(rename = "type")]
    pub container_type: String,
    /// Message timestamp.
    #[serde(default)]
    pub message_ts: Option<MessageTs>,
    /// Channel ID.
    #[serde(default)]
    pub channel_id: Option<ChannelId>,
}

/// Channel where interaction occurred.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionChannel {
    /// Channel ID.
    pub id: ChannelId,
    /// Channel name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Message attached to a `block_actions` interaction.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionMessage {
    /// Message timestamp.
    pub ts: MessageTs,
}

/// Action that was triggered.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionAction {
    /// Action ID (set when creating the button).
    pub action_id: String,
    /// Value attached to the action.
    #[serde(default)]
    pub value: Option<String>,
}

/// Submitted modal.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewPayload {
    /// Callback ID set when the modal was opened.
    #[serde(default)]
    pub callback_id: Option<String>,
    /// Input values keyed by block ID, then action ID.
    pub state: ViewState,
}

/// Values entered into a modal.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewState {
    #[serde(default)]
    pub values: HashMap<String, HashMap<String, StateValue>>,
}

impl ViewState {
    /// Look up the value of one input element.
    #[must_use]
    pub fn get(&self, block_id: &str, action_id: &str) -> Option<&StateValue> {
        self.values.get(block_id).and_then(|b| b.get(action_id))
    }
}

/// Value of a single input element.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StateValue {
    /// Text inputs.
    #[serde(default)]
    pub value: Option<String>,
    /// Multi-select inputs.
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
}

/// Selected option of a select menu.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectedOption {
    pub value: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_message_serializes_null_blocks() {
        let update = UpdateMessage {
            channel: ChannelId::new("C1"),
            ts: MessageTs::new("1.1"),
            text: "done".to_string(),
            blocks: None,
        };
        let value = serde_json::to_value(&update).unwrap();
        assert!(value["blocks"].is_null());
        assert!(value.as_object().unwrap().contains_key("blocks"));
    }

    #[test]
    fn test_block_tags() {
        let value = serde_json::to_value(vec![
            Block::Header {
                text: PlainText::new("Hi"),
            },
            Block::Divider,
        ])
        .unwrap();
        assert_eq!(value[0]["type"], "header");
        assert_eq!(value[0]["text"]["type"], "plain_text");
        assert_eq!(value[1]["type"], "divider");
    }

    #[test]
    fn test_next_cursor_treats_empty_as_end() {
        let page: ConversationsPage = serde_json::from_value(json!({
            "ok": true,
            "channels": [{"id": "C1", "name": "general"}],
            "response_metadata": {"next_cursor": ""}
        }))
        .unwrap();
        assert_eq!(page.next_cursor(), None);
        assert_eq!(page.channels.len(), 1);

        let page: ConversationsPage =
            serde_json::from_value(json!({"response_metadata": {"next_cursor": "dGVhbTpD"}}))
                .unwrap();
        assert_eq!(page.next_cursor(), Some("dGVhbTpD"));
    }

    #[test]
    fn test_slash_command_from_form() {
        let command = SlashCommand::from_form(
            "command=%2Fannounce&user_id=U1&trigger_id=123.456&text=hello+there",
        )
        .unwrap();
        assert_eq!(command.command, "/announce");
        assert_eq!(command.user_id.as_str(), "U1");
        assert_eq!(command.trigger_id, "123.456");
    }

    #[test]
    fn test_slash_command_requires_trigger() {
        let result = SlashCommand::from_form("user_id=U1");
        assert!(matches!(result, Err(SlackError::InvalidPayload(_))));
    }

    #[test]
    fn test_origin_from_block_actions() {
        let payload: InteractionPayload = serde_json::from_value(json!({
            "type": "block_actions",
            "user": {"id": "UAPPROVER"},
            "channel": {"id": "CAPPROVE"},
            "message": {"ts": "1700000000.000100"},
            "actions": []
        }))
        .unwrap();

        let origin = payload.origin().unwrap();
        assert_eq!(origin.channel.as_str(), "CAPPROVE");
        assert_eq!(origin.ts.as_str(), "1700000000.000100");
        assert_eq!(origin.user.as_str(), "UAPPROVER");
    }

    #[test]
    fn test_origin_falls_back_to_container() {
        let payload: InteractionPayload = serde_json::from_value(json!({
            "type": "block_actions",
            "user": {"id": "U1"},
            "container": {"type": "message", "message_ts": "2.2", "channel_id": "C2"}
        }))
        .unwrap();

        let origin = payload.origin().unwrap();
        assert_eq!(origin.channel.as_str(), "C2");
        assert_eq!(origin.ts.as_str(), "2.2");
    }

    #[test]
    fn test_origin_missing_channel() {
        let payload: InteractionPayload = serde_json::from_value(json!({
            "type": "block_actions",
            "user": {"id": "U1"},
            "message": {"ts": "1.1"}
        }))
        .unwrap();
        assert!(matches!(payload.origin(), Err(SlackError::InvalidPayload(_))));
    }
}
