//! Business logic services.
//!
//! # Services
//!
//! - `announcements` - Request, reject and broadcast announcements through Slack

pub mod announcements;

pub use announcements::{APPROVED_TEXT, AnnouncementService, BroadcastReport, REJECTED_TEXT};
