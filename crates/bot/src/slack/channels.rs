//! Paginated listing of the conversations the bot belongs to.

use std::collections::HashSet;

use tracing::{debug, instrument, warn};

use super::client::{SlackTransport, decode};
use super::error::SlackError;
use super::types::{Channel, ConversationsPage};

/// Web API method listing the bot's conversations.
const LIST_METHOD: &str = "users.conversations";

/// Default cap on the number of pages fetched in one listing.
pub const DEFAULT_MAX_PAGES: usize = 100;

/// List every conversation the bot is a member of.
///
/// Follows `response_metadata.next_cursor` until it comes back empty,
/// concatenating pages in arrival order. At most `max_pages` calls are made.
///
/// # Errors
///
/// Returns [`SlackError::Pagination`] if the listing is still going after
/// `max_pages` calls or the remote hands back a cursor it already returned.
/// Transport and API errors are propagated unchanged.
#[instrument(skip(transport))]
pub async fn list_member_channels<T: SlackTransport>(
    transport: &T,
    max_pages: usize,
) -> Result<Vec<Channel>, SlackError> {
    collect_channels(transport, max_pages, usize::MAX, |_| true).await
}

/// List up to `limit` unarchived conversations the bot is a member of.
///
/// Stops fetching as soon as `limit` channels are collected, so a large
/// workspace costs only as many pages as the modal can show.
///
/// # Errors
///
/// Same as [`list_member_channels`].
#[instrument(skip(transport))]
pub async fn list_selectable_channels<T: SlackTransport>(
    transport: &T,
    max_pages: usize,
    limit: usize,
) -> Result<Vec<Channel>, SlackError> {
    collect_channels(transport, max_pages, limit, |c| !c.is_archived).await
}

async fn collect_channels<T, F>(
    transport: &T,
    max_pages: usize,
    limit: usize,
    keep: F,
) -> Result<Vec<Channel>, SlackError>
where
    T: SlackTransport,
    F: Fn(&Channel) -> bool,
{
    let mut channels = Vec::new();
    let mut seen = HashSet::new();
    let mut cursor: Option<String> = None;

    for page_number in 1..=max_pages {
        let body = match cursor.as_deref() {
            Some(cursor) => transport.call_get(LIST_METHOD, &[("cursor", cursor)]).await?,
            None => transport.call_get(LIST_METHOD, &[]).await?,
        };
        let page: ConversationsPage = decode(LIST_METHOD, body)?;

        debug!(page = page_number, count = page.channels.len(), "Fetched channel page");

        let next = page.next_cursor().map(str::to_owned);
        channels.extend(page.channels.into_iter().filter(|c| keep(c)));

        if channels.len() >= limit {
            channels.truncate(limit);
            return Ok(channels);
        }

        match next {
            None => return Ok(channels),
            Some(next) => {
                if !seen.insert(next.clone()) {
                    warn!(cursor = %next, "Slack repeated a pagination cursor");
                    return Err(SlackError::Pagination(format!(
                        "{LIST_METHOD} repeated cursor {next}"
                    )));
                }
                cursor = Some(next);
            }
        }
    }

    warn!(max_pages, "Channel listing exceeded page limit");
    Err(SlackError::Pagination(format!(
        "{LIST_METHOD} did not finish within {max_pages} pages"
    )))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::slack::testing::RecordingTransport;
    use serde_json::json;

    fn page(ids: &[&str], cursor: &str) -> serde_json::Value {
        let channels: Vec<_> = ids.iter().map(|id| json!({"id": id, "name": id})).collect();
        json!({
            "ok": true,
            "channels": channels,
            "response_metadata": {"next_cursor": cursor}
        })
    }

    fn ids(channels: &[Channel]) -> Vec<&str> {
        channels.iter().map(|c| c.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_concatenates_pages_in_order() {
        let transport = RecordingTransport::new();
        transport.respond(LIST_METHOD, page(&["C1", "C2"], "c1"));
        transport.respond(LIST_METHOD, page(&["C3"], ""));

        let channels = list_member_channels(&transport, DEFAULT_MAX_PAGES)
            .await
            .unwrap();

        assert_eq!(ids(&channels), vec!["C1", "C2", "C3"]);

        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].params.is_empty());
        assert_eq!(calls[1].params, vec![("cursor".to_string(), "c1".to_string())]);
    }

    #[tokio::test]
    async fn test_missing_metadata_ends_listing() {
        let transport = RecordingTransport::new();
        transport.respond(LIST_METHOD, json!({"ok": true, "channels": [{"id": "C1"}]}));

        let channels = list_member_channels(&transport, DEFAULT_MAX_PAGES)
            .await
            .unwrap();

        assert_eq!(ids(&channels), vec!["C1"]);
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_stops_after_max_pages() {
        let transport = RecordingTransport::new();
        for i in 0..10 {
            transport.respond(LIST_METHOD, page(&["C1"], &format!("cursor-{i}")));
        }

        let result = list_member_channels(&transport, 3).await;

        assert!(matches!(result, Err(SlackError::Pagination(_))));
        assert_eq!(transport.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_repeated_cursor_fails_early() {
        let transport = RecordingTransport::new();
        transport.respond(LIST_METHOD, page(&["C1"], "same"));
        transport.respond(LIST_METHOD, page(&["C2"], "same"));
        transport.respond(LIST_METHOD, page(&["C3"], ""));

        let result = list_member_channels(&transport, DEFAULT_MAX_PAGES).await;

        assert!(matches!(result, Err(SlackError::Pagination(_))));
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_selectable_stops_once_limit_reached() {
        let transport = RecordingTransport::new();
        transport.respond(LIST_METHOD, page(&["C1", "C2", "C3"], "more"));
        transport.respond(LIST_METHOD, page(&["C4"], ""));

        let channels = list_selectable_channels(&transport, DEFAULT_MAX_PAGES, 2)
            .await
            .unwrap();

        assert_eq!(ids(&channels), vec!["C1", "C2"]);
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_selectable_skips_archived() {
        let transport = RecordingTransport::new();
        transport.respond(
            LIST_METHOD,
            json!({
                "ok": true,
                "channels": [
                    {"id": "C1", "is_archived": true},
                    {"id": "C2"}
                ],
                "response_metadata": {"next_cursor": "more"}
            }),
        );
        transport.respond(
            LIST_METHOD,
            json!({"ok": true, "channels": [{"id": "C3", "is_archived": true}]}),
        );

        let channels = list_selectable_channels(&transport, DEFAULT_MAX_PAGES, 100)
            .await
            .unwrap();

        assert_eq!(ids(&channels), vec!["C2"]);
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_api_error_propagates() {
        let transport = RecordingTransport::new();
        transport.respond(LIST_METHOD, json!({"ok": false, "error": "invalid_auth"}));

        let result = list_member_channels(&transport, DEFAULT_MAX_PAGES).await;

        assert!(matches!(result, Err(SlackError::Api { .. })));
    }
}
