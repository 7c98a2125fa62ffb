//! Shared types, adapter traits, and core utilities for the revue service.
//!
//! This crate contains the foundational types that are shared between the
//! web crate and the storage adapter implementations. Keeping them in a
//! separate crate lets adapters compile without pulling in the server.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod error;
pub mod prelude;
pub mod review_adapter;
pub mod types;

// vim: ts=4
