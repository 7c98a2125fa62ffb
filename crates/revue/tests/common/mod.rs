//! Shared helpers for the HTTP API tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use revue::AppBuilder;
use revue::rate_limit::RateLimitConfig;
use revue_review_adapter_memory::ReviewAdapterMemory;

/// Router over an empty in-memory store
pub fn router(rate_limit: Option<RateLimitConfig>) -> Router {
	let mut builder = AppBuilder::new();
	builder.review_adapter(Arc::new(ReviewAdapterMemory::new())).rate_limit(rate_limit);
	let app = builder.build().unwrap();
	revue::routes::init(app)
}

pub fn request(method: &str, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
	let builder = Request::builder().method(method).uri(uri);
	match body {
		Some(json) => builder
			.header("content-type", "application/json")
			.body(Body::from(json.to_string()))
			.unwrap(),
		None => builder.body(Body::empty()).unwrap(),
	}
}

pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
	app.clone().oneshot(req).await.unwrap()
}

pub async fn body_json(res: Response<Body>) -> serde_json::Value {
	let bytes = res.into_body().collect().await.unwrap().to_bytes();
	serde_json::from_slice(&bytes).unwrap()
}

/// Send a request and decode the JSON response, asserting the status
pub async fn call(
	app: &Router,
	method: &str,
	uri: &str,
	body: Option<serde_json::Value>,
	status: StatusCode,
) -> serde_json::Value {
	let res = send(app, request(method, uri, body)).await;
	assert_eq!(res.status(), status, "{} {}", method, uri);
	if status == StatusCode::NO_CONTENT {
		return serde_json::Value::Null;
	}
	body_json(res).await
}

// vim: ts=4
