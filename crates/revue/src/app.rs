//! App builder - constructs and runs the revue application

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::prelude::*;
use crate::review_adapter::ReviewAdapter;
use crate::{routes, webserver};
use revue_core::rate_limit::{AdmissionController, RateLimitConfig};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default request body limit (512 KiB)
pub const DEFAULT_BODY_LIMIT: usize = 512 * 1024;

#[derive(Debug, Clone)]
pub struct AppBuilderOpts {
	pub listen: Box<str>,
	pub body_limit: usize,
}

#[derive(Debug)]
pub struct AppState {
	pub review_adapter: Arc<dyn ReviewAdapter>,
	/// `None` when admission control is disabled
	pub rate_limiter: Option<Arc<AdmissionController>>,
	pub opts: AppBuilderOpts,
}

pub type App = Arc<AppState>;

pub struct AppBuilder {
	opts: AppBuilderOpts,
	review_adapter: Option<Arc<dyn ReviewAdapter>>,
	rate_limit: Option<RateLimitConfig>,
}

impl AppBuilder {
	pub fn new() -> Self {
		// A subscriber may already be installed (tests, embedding binaries)
		let _ = tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_target(false)
			.try_init();
		AppBuilder {
			opts: AppBuilderOpts {
				listen: "127.0.0.1:8080".into(),
				body_limit: DEFAULT_BODY_LIMIT,
			},
			review_adapter: None,
			rate_limit: Some(RateLimitConfig::default()),
		}
	}

	// Opts
	pub fn listen(&mut self, listen: impl Into<Box<str>>) -> &mut Self {
		self.opts.listen = listen.into();
		self
	}
	pub fn body_limit(&mut self, body_limit: usize) -> &mut Self {
		self.opts.body_limit = body_limit;
		self
	}
	/// `None` disables admission control entirely
	pub fn rate_limit(&mut self, rate_limit: Option<RateLimitConfig>) -> &mut Self {
		self.rate_limit = rate_limit;
		self
	}

	// Adapters
	pub fn review_adapter(&mut self, review_adapter: Arc<dyn ReviewAdapter>) -> &mut Self {
		self.review_adapter = Some(review_adapter);
		self
	}

	/// Assemble the shared application state without starting any task
	pub fn build(self) -> RvResult<App> {
		let Some(review_adapter) = self.review_adapter else {
			error!("FATAL: No review adapter configured");
			return Err(Error::Internal("No review adapter configured".to_string()));
		};

		let rate_limiter = match self.rate_limit {
			Some(config) => Some(Arc::new(AdmissionController::new(config).inspect_err(|e| {
				error!("FATAL: Invalid rate limit configuration: {}", e);
			})?)),
			None => {
				warn!("Rate limiting disabled");
				None
			}
		};

		Ok(Arc::new(AppState { review_adapter, rate_limiter, opts: self.opts }))
	}

	pub async fn run(self) -> RvResult<()> {
		info!("revue V{}", VERSION);

		let app = self.build()?;
		let router = routes::init(app.clone());

		webserver::serve(app, router, CancellationToken::new()).await
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}


// vim: ts=4
