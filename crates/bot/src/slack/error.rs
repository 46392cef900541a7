//! Slack-related errors.

use thiserror::Error;

/// Errors that can occur when interacting with Slack.
#[derive(Debug, Error)]
pub enum SlackError {
    /// HTTP request failed.
    #[error("Slack request failed: {0}")]
    Request(String),

    /// Failed to parse response, or the response is missing a field we need.
    #[error("Slack response error: {0}")]
    Response(String),

    /// Slack API returned `ok: false`.
    #[error("Slack API error in {method}: {error}")]
    Api {
        /// Web API method that failed.
        method: String,
        /// Error code reported by Slack.
        error: String,
    },

    /// Invalid webhook signature.
    #[error("Invalid Slack signature: {0}")]
    InvalidSignature(String),

    /// Failed to parse or build an interaction payload.
    #[error("Invalid interaction payload: {0}")]
    InvalidPayload(String),

    /// A modal input was rejected; `block_id` names the offending input block.
    #[error("Invalid input in {block_id}: {reason}")]
    InvalidInput {
        /// Block ID of the modal input the error belongs to.
        block_id: &'static str,
        /// Message shown under the input.
        reason: String,
    },

    /// Paginated listing did not terminate.
    #[error("Slack pagination aborted: {0}")]
    Pagination(String),

    /// Configuration error.
    #[error("Slack configuration error: {0}")]
    Config(String),
}
