//! Revue is a small review and comment service.
//!
//! # Features
//!
//! - Reviews with nested comment threads
//!     - positional ids, shifting on delete
//!     - single-lock in-memory store adapter
//! - Per-client token bucket admission control
//!     - client key from X-Forwarded-For, X-Real-IP, Forwarded or the peer address
//!     - idle visitors reclaimed by a background sweeper
//! - JSON everywhere, including errors and unknown routes

// Re-export shared types and adapter traits from revue-types
pub use revue_types::error;
pub use revue_types::review_adapter;
pub use revue_types::types;

pub use revue_core::rate_limit;

// Local modules
pub mod app;
pub mod handler;
pub mod prelude;
pub mod routes;
pub mod webserver;

pub use crate::app::{App, AppBuilder};

// vim: ts=4
