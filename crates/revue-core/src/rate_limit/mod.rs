//! Rate Limiting System
//!
//! Per-client token bucket admission control. Every client key (derived from
//! the request by a configurable strategy) gets its own bucket; buckets of
//! clients that stop sending requests are reclaimed by a background sweeper.

mod config;
mod error;
mod extractors;
mod limiter;
mod middleware;
mod sweeper;

pub use config::RateLimitConfig;
pub use error::RateLimitError;
pub use extractors::{KeyStrategy, extract_client_key};
pub use limiter::{AdmissionController, AdmissionStats, VisitorState};
pub use middleware::RateLimitLayer;

// vim: ts=4
