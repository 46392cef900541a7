//! Herald Core - Shared types library.
//!
//! This crate provides common types used across all Herald components:
//! - `bot` - Slack webhook receiver and announcement workflow
//! - `cli` - Command-line tools for operators
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for Slack IDs, announcement records, and decisions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
