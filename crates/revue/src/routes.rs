use axum::{
	Router,
	extract::DefaultBodyLimit,
	http::{HeaderValue, header},
	routing::get,
};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::handler;
use crate::prelude::*;
use revue_core::rate_limit::RateLimitLayer;

fn init_reviews() -> Router<App> {
	Router::new()
		.route("/reviews", get(handler::list_reviews).post(handler::post_review))
		.route("/reviews/", get(handler::list_reviews).post(handler::post_review))
		.route(
			"/reviews/{review_id}",
			get(handler::get_review).put(handler::put_review).delete(handler::delete_review),
		)
		.route(
			"/reviews/{review_id}/comments",
			get(handler::list_comments).post(handler::post_comment),
		)
		.route(
			"/reviews/{review_id}/comments/{comment_id}",
			get(handler::get_comment).put(handler::put_comment).delete(handler::delete_comment),
		)
}

pub fn init(app: App) -> Router {
	let mut router = Router::new()
		.merge(init_reviews())
		.route("/healthz", get(handler::health))
		.fallback(handler::not_found)
		.layer(DefaultBodyLimit::max(app.opts.body_limit))
		.layer(SetResponseHeaderLayer::if_not_present(
			header::CONTENT_TYPE,
			HeaderValue::from_static("application/json; charset=utf-8"),
		));

	if let Some(rate_limiter) = &app.rate_limiter {
		router = router.layer(RateLimitLayer::new(rate_limiter.clone()));
	}

	router.layer(TraceLayer::new_for_http()).with_state(app)
}

// vim: ts=4
