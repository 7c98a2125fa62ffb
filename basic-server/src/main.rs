use std::{env, num::NonZeroU32, process::ExitCode, str::FromStr, sync::Arc, time::Duration};

use revue::AppBuilder;
use revue::error::{Error, RvResult};
use revue::rate_limit::{KeyStrategy, RateLimitConfig};
use revue_review_adapter_memory::ReviewAdapterMemory;
use tracing::error;

/// Parse a setting, falling back to `default` when it is absent
fn parse_or<T: FromStr>(name: &str, value: Option<&str>, default: T) -> RvResult<T> {
	match value {
		Some(value) => value
			.trim()
			.parse()
			.map_err(|_| Error::ValidationError(format!("invalid value for {}: {:?}", name, value))),
		None => Ok(default),
	}
}

/// Read and parse an environment variable, falling back to `default` when unset
fn env_or<T: FromStr>(name: &str, default: T) -> RvResult<T> {
	parse_or(name, env::var(name).ok().as_deref(), default)
}

fn rate_limit_config() -> RvResult<Option<RateLimitConfig>> {
	let enabled = env::var("RATE_LIMIT").unwrap_or_default();
	match enabled.trim().to_ascii_lowercase().as_str() {
		"" | "on" | "true" | "1" => {}
		"off" | "false" | "0" => return Ok(None),
		other => return Err(Error::ValidationError(format!("invalid value for RATE_LIMIT: {:?}", other))),
	}

	// Zero burst admits nothing
	let burst: NonZeroU32 = env_or("RATE_LIMIT_BURST", NonZeroU32::new(2).unwrap_or(NonZeroU32::MIN))?;
	let config = RateLimitConfig::new(env_or("RATE_LIMIT_RPS", 5.0)?, burst.get())
		.key_strategy(env_or("RATE_LIMIT_KEY", KeyStrategy::ForwardedFor)?)
		.idle_timeout(Duration::from_secs(env_or("RATE_LIMIT_IDLE_SECS", 600)?))
		.sweep_interval(Duration::from_secs(env_or("RATE_LIMIT_SWEEP_SECS", 60)?));
	config.validate()?;
	Ok(Some(config))
}

async fn run() -> RvResult<()> {
	let mut builder = AppBuilder::new();
	builder
		.listen(env_or("LISTEN", "127.0.0.1:8080".to_string())?)
		.body_limit(env_or("BODY_LIMIT", revue::app::DEFAULT_BODY_LIMIT)?)
		.rate_limit(rate_limit_config()?)
		.review_adapter(Arc::new(ReviewAdapterMemory::new()));

	builder.run().await
}

#[tokio::main]
async fn main() -> ExitCode {
	match run().await {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			error!("FATAL: {}", e);
			ExitCode::FAILURE
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_or_default() {
		assert!((parse_or::<f64>("RATE_LIMIT_RPS", None, 5.0).unwrap() - 5.0).abs() < f64::EPSILON);
		assert_eq!(parse_or("RATE_LIMIT_IDLE_SECS", Some(" 30 "), 600u64).unwrap(), 30);
		assert!(matches!(
			parse_or("RATE_LIMIT_RPS", Some("fast"), 5.0),
			Err(Error::ValidationError(_))
		));
	}

	#[test]
	fn test_zero_burst_is_rejected() {
		let default = NonZeroU32::MIN;
		assert!(matches!(
			parse_or::<NonZeroU32>("RATE_LIMIT_BURST", Some("0"), default),
			Err(Error::ValidationError(_))
		));
		assert_eq!(parse_or::<NonZeroU32>("RATE_LIMIT_BURST", Some("3"), default).unwrap().get(), 3);
	}

	#[test]
	fn test_key_strategy_setting() {
		let strategy = parse_or("RATE_LIMIT_KEY", Some("real-ip"), KeyStrategy::ForwardedFor);
		assert_eq!(strategy.unwrap(), KeyStrategy::RealIp);
		assert!(parse_or("RATE_LIMIT_KEY", Some("cookie"), KeyStrategy::ForwardedFor).is_err());
	}
}

// vim: ts=4
