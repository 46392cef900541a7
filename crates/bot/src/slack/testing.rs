//! Recording fake of the Slack transport.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde_json::{Value, json};

use super::client::SlackTransport;
use super::error::SlackError;

/// One call seen by [`RecordingTransport`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: String,
    /// JSON body for POST calls, `Null` for GET calls.
    pub payload: Value,
    /// Query parameters for GET calls.
    pub params: Vec<(String, String)>,
}

/// Fake transport that records every call and replays canned responses.
///
/// Responses are queued per method and consumed in order. A method with an
/// empty queue answers `{"ok": true}`.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<RecordedCall>>,
    responses: Mutex<HashMap<String, VecDeque<Result<Value, SlackError>>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response body for `method`.
    pub fn respond(&self, method: &str, body: Value) {
        self.enqueue(method, Ok(body));
    }

    /// Queue a transport failure for `method`.
    pub fn fail(&self, method: &str, error: SlackError) {
        self.enqueue(method, Err(error));
    }

    /// Calls made so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Method names of the calls made so far, in order.
    pub fn methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.method).collect()
    }

    fn enqueue(&self, method: &str, response: Result<Value, SlackError>) {
        self.responses
            .lock()
            .unwrap()
            .entry(method.to_string())
            .or_default()
            .push_back(response);
    }

    fn record(&self, call: RecordedCall) -> Result<Value, SlackError> {
        let method = call.method.clone();
        self.calls.lock().unwrap().push(call);
        self.responses
            .lock()
            .unwrap()
            .get_mut(&method)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(json!({"ok": true})))
    }
}

impl SlackTransport for RecordingTransport {
    async fn call_post(&self, method: &str, payload: &Value) -> Result<Value, SlackError> {
        self.record(RecordedCall {
            method: method.to_string(),
            payload: payload.clone(),
            params: Vec::new(),
        })
    }

    async fn call_get(&self, method: &str, params: &[(&str, &str)]) -> Result<Value, SlackError> {
        self.record(RecordedCall {
            method: method.to_string(),
            payload: Value::Null,
            params: params
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        })
    }
}
