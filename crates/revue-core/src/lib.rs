//! Core infrastructure for the revue service.
//!
//! Holds the request admission machinery that sits in front of the review
//! handlers. It does not depend on any storage adapter, so it can be reused
//! by any router.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod prelude;
pub mod rate_limit;

pub use rate_limit::{AdmissionController, KeyStrategy, RateLimitConfig, RateLimitLayer};

// vim: ts=4
