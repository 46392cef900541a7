//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health               - Liveness check
//! GET  /health/ready         - Readiness check (calls Slack auth.test)
//!
//! # Slack
//! POST /slack/commands       - Slash command, opens the request modal
//! POST /slack/interactions   - Modal submissions and approve/reject clicks
//! ```

use axum::Router;

use crate::state::AppState;

pub mod health;
pub mod slack;

/// Build all application routes.
pub fn routes() -> Router<AppState> {
    Router::new().merge(health::router()).merge(slack::router())
}
