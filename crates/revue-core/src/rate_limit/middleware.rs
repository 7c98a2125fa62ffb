//! Rate Limiting Middleware
//!
//! Tower middleware layer for applying admission control to Axum routes.

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::response::IntoResponse;
use futures::future::BoxFuture;
use hyper::Request;
use tower::{Layer, Service};

use super::extractors::KeyStrategy;
use super::limiter::AdmissionController;

/// Rate limit middleware layer
#[derive(Clone, Debug)]
pub struct RateLimitLayer {
	controller: Arc<AdmissionController>,
	strategy: KeyStrategy,
}

impl RateLimitLayer {
	/// Create a layer keyed by the controller's configured strategy
	pub fn new(controller: Arc<AdmissionController>) -> Self {
		let strategy = controller.config().key_strategy;
		Self { controller, strategy }
	}
}

impl<S> Layer<S> for RateLimitLayer {
	type Service = RateLimitService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		RateLimitService { inner, controller: self.controller.clone(), strategy: self.strategy }
	}
}

/// Rate limit middleware service
#[derive(Clone, Debug)]
pub struct RateLimitService<S> {
	inner: S,
	controller: Arc<AdmissionController>,
	strategy: KeyStrategy,
}

impl<S> Service<Request<Body>> for RateLimitService<S>
where
	S: Service<Request<Body>, Response = axum::response::Response> + Clone + Send + 'static,
	S::Future: Send + 'static,
{
	type Response = S::Response;
	type Error = S::Error;
	type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, req: Request<Body>) -> Self::Future {
		// Rejected requests never reach the handler
		let key = self.strategy.extract(&req);
		if let Err(error) = self.controller.check(&key) {
			return Box::pin(async move { Ok(error.into_response()) });
		}

		let mut inner = self.inner.clone();
		// The clone may not be ready; swap so the polled service handles this call
		std::mem::swap(&mut self.inner, &mut inner);
		Box::pin(inner.call(req))
	}
}


// vim: ts=4
