//! Slack webhook handlers.
//!
//! Handles the slash command that opens the request modal, and the
//! interactions that follow: modal submissions and approve/reject clicks.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use herald_core::{Announcement, Decision};
use serde_json::json;
use tracing::{debug, error, info, instrument, warn};

use crate::error::AppError;
use crate::slack::{
    InteractionPayload, MAX_SELECT_OPTIONS, REQUEST_CALLBACK_ID, SlackError, SlackTransport,
    SlashCommand, list_selectable_channels, request_modal, submission_from_view,
};
use crate::state::AppState;

/// Create Slack webhook routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/slack/commands", post(handle_command))
        .route("/slack/interactions", post(handle_interaction))
}

/// Reply shown to the requester when there is nowhere to announce.
pub const NO_CHANNELS_TEXT: &str =
    "I'm not a member of any channels yet. Invite me to a channel, then try again.";

/// Handle the announcement slash command.
///
/// Lists the channels the bot belongs to and opens the request modal. With
/// no usable channel the requester gets an ephemeral reply instead.
#[instrument(skip(state, headers, body))]
async fn handle_command(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Response, AppError> {
    verify_request(&state, &headers, &body)?;

    let command =
        SlashCommand::from_form(&body).map_err(|e| AppError::BadRequest(e.to_string()))?;

    info!(command = %command.command, user = %command.user_id, "Opening request modal");

    let channels =
        list_selectable_channels(state.slack(), state.max_pages(), MAX_SELECT_OPTIONS).await?;

    if channels.is_empty() {
        info!(user = %command.user_id, "No channels to offer");
        return Ok(Json(json!({
            "response_type": "ephemeral",
            "text": NO_CHANNELS_TEXT,
        }))
        .into_response());
    }

    state
        .slack()
        .open_view(&command.trigger_id, &request_modal(&channels))
        .await?;

    Ok(StatusCode::OK.into_response())
}

/// Handle a Slack interaction webhook.
#[instrument(skip(state, headers, body))]
async fn handle_interaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Response, AppError> {
    verify_request(&state, &headers, &body)?;

    let payload = parse_interaction(&body)?;

    match payload.interaction_type.as_str() {
        "view_submission" => handle_submission(&state, &payload).await,
        "block_actions" => {
            handle_decision(&state, &payload).await;
            // Slack has already rendered the click; always acknowledge.
            Ok(StatusCode::OK.into_response())
        }
        other => {
            warn!(interaction_type = %other, "Unsupported interaction type");
            Err(AppError::BadRequest(format!(
                "Unsupported interaction type: {other}"
            )))
        }
    }
}

/// Turn a submitted request modal into an approval request.
///
/// Invalid input is reported back inside the modal instead of closing it.
async fn handle_submission(
    state: &AppState,
    payload: &InteractionPayload,
) -> Result<Response, AppError> {
    let view = payload
        .view
        .as_ref()
        .ok_or_else(|| AppError::BadRequest("view_submission without view".into()))?;

    if view.callback_id.as_deref() != Some(REQUEST_CALLBACK_ID) {
        return Err(AppError::BadRequest("Unknown view callback".into()));
    }

    let submission = match submission_from_view(view) {
        Ok(submission) => submission,
        Err(SlackError::InvalidInput { block_id, reason }) => {
            debug!(block_id, reason = %reason, "Rejecting incomplete submission");
            return Ok(modal_errors(block_id, &reason));
        }
        Err(e) => return Err(e.into()),
    };

    let requester = payload.user.id.clone();
    match state
        .announcements()
        .request_announcement(&requester, submission)
        .await
    {
        Ok(_) => Ok(StatusCode::OK.into_response()),
        Err(SlackError::InvalidInput { block_id, reason }) => Ok(modal_errors(block_id, &reason)),
        Err(e) => Err(e.into()),
    }
}

/// Apply an approver's click. Failures are logged, never returned.
async fn handle_decision(state: &AppState, payload: &InteractionPayload) {
    let Some(action) = payload.actions.first() else {
        warn!("block_actions without actions");
        return;
    };

    let Some(decision) = Decision::from_action_id(&action.action_id) else {
        debug!(action_id = %action.action_id, "Ignoring unrelated action");
        return;
    };

    let announcement: Announcement = match action
        .value
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
    {
        Ok(Some(announcement)) => announcement,
        Ok(None) => {
            warn!(action_id = %action.action_id, "Decision button without value");
            return;
        }
        Err(e) => {
            warn!(error = %e, "Decision button carries an unreadable announcement");
            return;
        }
    };

    let origin = match payload.origin() {
        Ok(origin) => origin,
        Err(e) => {
            warn!(error = %e, "Cannot locate the approval message");
            return;
        }
    };

    info!(decision = %decision, approver = %origin.user, title = %announcement.title, "Processing decision");

    match decision {
        Decision::Approve => {
            match state
                .announcements()
                .post_announcement(&origin, &announcement)
                .await
            {
                Ok(report) if report.is_complete() => {
                    debug!(delivered = report.delivered.len(), "Announcement delivered");
                }
                Ok(report) => {
                    let failed: Vec<String> =
                        report.failed.iter().map(|(c, _)| c.to_string()).collect();
                    error!(failed = ?failed, "Announcement partially delivered");
                }
                Err(e) => error!(error = %e, "Approval failed"),
            }
        }
        Decision::Reject => {
            if let Err(e) = state
                .announcements()
                .reject_announcement(&origin, &announcement)
                .await
            {
                error!(error = %e, "Rejection failed");
            }
        }
    }
}

/// Check the Slack signature headers against the raw body.
fn verify_request(state: &AppState, headers: &HeaderMap, body: &str) -> Result<(), AppError> {
    let timestamp = headers
        .get("X-Slack-Request-Timestamp")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Missing timestamp header".into()))?;

    let signature = headers
        .get("X-Slack-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Missing signature header".into()))?;

    state
        .slack()
        .verify_signature(timestamp, body, signature)
        .map_err(|e| match e {
            SlackError::Config(msg) => AppError::Internal(msg),
            other => AppError::Unauthorized(other.to_string()),
        })
}

/// Decode the `payload` field of a form-encoded interaction body.
fn parse_interaction(body: &str) -> Result<InteractionPayload, AppError> {
    let raw = url::form_urlencoded::parse(body.as_bytes())
        .find(|(key, _)| key == "payload")
        .map(|(_, value)| value)
        .ok_or_else(|| AppError::BadRequest("Invalid payload format".into()))?;

    serde_json::from_str(&raw)
        .map_err(|e| AppError::BadRequest(format!("Failed to parse payload: {e}")))
}

/// Modal response that keeps the modal open with an error under the offending input.
fn modal_errors(block_id: &str, reason: &str) -> Response {
    Json(json!({
        "response_action": "errors",
        "errors": { block_id: reason },
    }))
    .into_response()
}
