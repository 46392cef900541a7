//! Core types for Herald.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod announcement;
pub mod id;
pub mod status;

pub use announcement::{Announcement, ApprovalRequest, Submission, channel_string};
pub use id::*;
pub use status::Decision;
