//! Admission Controller
//!
//! Keeps one governor token bucket per visitor. The registry lookup, the
//! `last_seen` refresh and the token draw happen under a single lock, so two
//! requests from the same client can never spend the same token.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use governor::clock::{Clock, DefaultClock};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use parking_lot::Mutex;

use super::config::RateLimitConfig;
use super::error::RateLimitError;
use crate::prelude::*;

/// Whether a visitor is still considered live
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisitorState {
	Active,
	Idle,
}

struct Visitor {
	limiter: DefaultDirectRateLimiter,
	last_seen: Instant,
}

impl Visitor {
	fn new(quota: Quota, now: Instant) -> Self {
		Self { limiter: RateLimiter::direct(quota), last_seen: now }
	}

	fn state(&self, now: Instant, idle_timeout: Duration) -> VisitorState {
		if now.saturating_duration_since(self.last_seen) > idle_timeout {
			VisitorState::Idle
		} else {
			VisitorState::Active
		}
	}
}

/// Snapshot of admission counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdmissionStats {
	pub tracked_visitors: usize,
	pub total_requests_limited: u64,
	pub total_visitors_reclaimed: u64,
}

/// Per-client token bucket registry
pub struct AdmissionController {
	config: RateLimitConfig,
	quota: Quota,
	visitors: Mutex<HashMap<Box<str>, Visitor>>,
	total_limited: AtomicU64,
	total_reclaimed: AtomicU64,
}

impl std::fmt::Debug for AdmissionController {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AdmissionController")
			.field("config", &self.config)
			.field("visitors", &self.visitors.lock().len())
			.finish_non_exhaustive()
	}
}

impl AdmissionController {
	pub fn new(config: RateLimitConfig) -> RvResult<Self> {
		config.validate()?;
		let quota = config.quota();
		info!(
			rate = config.rate,
			burst = config.burst,
			key = %config.key_strategy,
			idle_secs = config.idle_timeout.as_secs(),
			"Rate limiter configured"
		);
		Ok(Self {
			config,
			quota,
			visitors: Mutex::new(HashMap::new()),
			total_limited: AtomicU64::new(0),
			total_reclaimed: AtomicU64::new(0),
		})
	}

	pub fn config(&self) -> &RateLimitConfig {
		&self.config
	}

	/// Draw one token from the visitor's bucket, creating it on first sight
	pub fn check(&self, key: &str) -> Result<(), RateLimitError> {
		let now = Instant::now();
		let result = {
			let mut visitors = self.visitors.lock();
			if let Some(visitor) = visitors.get_mut(key) {
				visitor.last_seen = now;
				visitor.limiter.check()
			} else {
				let visitor = Visitor::new(self.quota, now);
				let result = visitor.limiter.check();
				visitors.insert(key.into(), visitor);
				result
			}
		};

		result.map_err(|not_until| {
			self.total_limited.fetch_add(1, Ordering::Relaxed);
			let retry_after = not_until.wait_time_from(DefaultClock::default().now());
			debug!(client = key, ?retry_after, "Request rate limited");
			RateLimitError::RateLimited { retry_after }
		})
	}

	/// Boolean form of [`check`](Self::check)
	pub fn allow(&self, key: &str) -> bool {
		self.check(key).is_ok()
	}

	/// `None` if the key has never been seen or was already reclaimed
	pub fn visitor_state(&self, key: &str) -> Option<VisitorState> {
		let now = Instant::now();
		self.visitors.lock().get(key).map(|v| v.state(now, self.config.idle_timeout))
	}

	/// Remove every visitor idle for longer than the configured timeout
	pub fn reclaim_idle(&self) -> usize {
		self.reclaim_idle_at(Instant::now())
	}

	/// Same as [`reclaim_idle`](Self::reclaim_idle) with an explicit clock
	pub fn reclaim_idle_at(&self, now: Instant) -> usize {
		let idle_timeout = self.config.idle_timeout;
		let (removed, remaining) = {
			let mut visitors = self.visitors.lock();
			let before = visitors.len();
			visitors.retain(|_, v| v.state(now, idle_timeout) == VisitorState::Active);
			(before - visitors.len(), visitors.len())
		};

		if removed > 0 {
			self.total_reclaimed.fetch_add(removed as u64, Ordering::Relaxed);
			debug!(removed, remaining, "Reclaimed idle visitors");
		}
		removed
	}

	pub fn stats(&self) -> AdmissionStats {
		AdmissionStats {
			tracked_visitors: self.visitors.lock().len(),
			total_requests_limited: self.total_limited.load(Ordering::Relaxed),
			total_visitors_reclaimed: self.total_reclaimed.load(Ordering::Relaxed),
		}
	}
}


// vim: ts=4
