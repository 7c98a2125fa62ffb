//! Rate Limiting Configuration

use std::num::NonZeroU32;
use std::time::Duration;

use governor::Quota;

use super::extractors::KeyStrategy;
use crate::prelude::*;

/// Longest span a full bucket may take to refill (`period * burst`)
///
/// Governor keeps GCRA state as `u64` nanoseconds and adds this span to the
/// current time, so it is kept well below `u64::MAX`.
pub const MAX_REFILL_WINDOW: Duration = Duration::from_nanos(u64::MAX / 4);

/// Per-client token bucket configuration
#[derive(Clone, Debug)]
pub struct RateLimitConfig {
	/// Tokens refilled per second
	pub rate: f64,
	/// Bucket capacity, must not be zero
	pub burst: u32,
	/// Visitors not seen for longer than this are reclaimed
	pub idle_timeout: Duration,
	/// How often the sweeper looks for idle visitors
	pub sweep_interval: Duration,
	/// How the client key is derived from a request
	pub key_strategy: KeyStrategy,
}

impl RateLimitConfig {
	pub fn new(rate: f64, burst: u32) -> Self {
		Self {
			rate,
			burst,
			..Self::default()
		}
	}

	pub fn key_strategy(mut self, key_strategy: KeyStrategy) -> Self {
		self.key_strategy = key_strategy;
		self
	}

	pub fn idle_timeout(mut self, idle_timeout: Duration) -> Self {
		self.idle_timeout = idle_timeout;
		self
	}

	pub fn sweep_interval(mut self, sweep_interval: Duration) -> Self {
		self.sweep_interval = sweep_interval;
		self
	}

	/// Reject settings the limiter cannot honor
	pub fn validate(&self) -> RvResult<()> {
		if !self.rate.is_finite() || self.rate <= 0.0 {
			return Err(Error::ValidationError(format!(
				"rate limit must be a positive number, got {}",
				self.rate
			)));
		}
		if self.burst == 0 {
			return Err(Error::ValidationError("rate limit burst must be at least 1".into()));
		}
		match self.period() {
			Some(period) if period.saturating_mul(self.burst) <= MAX_REFILL_WINDOW => {}
			_ => {
				return Err(Error::ValidationError(format!(
					"rate limit {} is too low, a {} token bucket would take longer than {:?} to refill",
					self.rate, self.burst, MAX_REFILL_WINDOW
				)));
			}
		}
		if self.sweep_interval.is_zero() {
			return Err(Error::ValidationError("sweep interval must not be zero".into()));
		}
		Ok(())
	}

	/// Emission interval `1 / rate`, `None` if it does not fit a `Duration`
	fn period(&self) -> Option<Duration> {
		Duration::try_from_secs_f64(1.0 / self.rate).ok()
	}

	/// Governor quota for one visitor's bucket
	///
	/// The emission interval is `1 / rate` seconds. Rates too high to express
	/// as a non-zero interval saturate to the fastest quota governor accepts,
	/// rates too low saturate to the slowest one `MAX_REFILL_WINDOW` allows.
	/// Use [`validate`](Self::validate) to reject such settings instead.
	pub fn quota(&self) -> Quota {
		let burst = NonZeroU32::new(self.burst).unwrap_or(NonZeroU32::MIN);
		let slowest = MAX_REFILL_WINDOW / burst.get();
		let period = match self.period() {
			Some(period) if period.saturating_mul(burst.get()) <= MAX_REFILL_WINDOW => period,
			_ => {
				warn!(rate = self.rate, ?slowest, "Rate limit too low, using the slowest refill");
				slowest
			}
		};
		Quota::with_period(period)
			.unwrap_or_else(|| Quota::per_second(NonZeroU32::MAX))
			.allow_burst(burst)
	}
}

impl Default for RateLimitConfig {
	fn default() -> Self {
		Self {
			rate: 5.0,
			burst: 2,
			idle_timeout: Duration::from_secs(600), // 10 minutes
			sweep_interval: Duration::from_secs(60),
			key_strategy: KeyStrategy::default(),
		}
	}
}


// vim: ts=4
