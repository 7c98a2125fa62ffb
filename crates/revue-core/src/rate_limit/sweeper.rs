//! Idle visitor sweeper
//!
//! Periodically drops buckets of visitors that have gone quiet. The task
//! runs until its cancellation token fires.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

use super::limiter::AdmissionController;
use crate::prelude::*;

impl AdmissionController {
	/// Start the background sweeper on the current tokio runtime
	pub fn spawn_sweeper(self: &Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
		let controller = Arc::clone(self);
		let period = controller.config().sweep_interval.max(Duration::from_millis(1));

		tokio::spawn(async move {
			let mut ticker = interval_at(Instant::now() + period, period);
			ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
			debug!(period_ms = period.as_millis(), "Idle sweeper started");

			loop {
				tokio::select! {
					() = cancel.cancelled() => break,
					_ = ticker.tick() => {
						controller.reclaim_idle();
					}
				}
			}

			debug!(tracked = controller.stats().tracked_visitors, "Idle sweeper stopped");
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::rate_limit::RateLimitConfig;

	#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
	async fn test_sweeper_reclaims_idle_visitors() {
		let config = RateLimitConfig::new(5.0, 2)
			.idle_timeout(Duration::from_millis(50))
			.sweep_interval(Duration::from_millis(20));
		let controller = Arc::new(AdmissionController::new(config).unwrap());
		let cancel = CancellationToken::new();
		let handle = controller.spawn_sweeper(cancel.clone());

		assert!(controller.allow("a"));
		assert!(controller.allow("b"));
		assert_eq!(controller.stats().tracked_visitors, 2);

		tokio::time::sleep(Duration::from_millis(300)).await;
		let stats = controller.stats();
		assert_eq!(stats.tracked_visitors, 0);
		assert_eq!(stats.total_visitors_reclaimed, 2);

		cancel.cancel();
		handle.await.unwrap();
	}

	#[tokio::test]
	async fn test_cancellation_stops_sweeper() {
		let config = RateLimitConfig::default().sweep_interval(Duration::from_secs(3600));
		let controller = Arc::new(AdmissionController::new(config).unwrap());
		let cancel = CancellationToken::new();
		let handle = controller.spawn_sweeper(cancel.clone());

		cancel.cancel();
		tokio::time::timeout(Duration::from_secs(1), handle)
			.await
			.expect("sweeper should stop once cancelled")
			.unwrap();
	}
}

// vim: ts=4
