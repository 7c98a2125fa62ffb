//! Rate Limiting Error Types

use std::time::Duration;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Rate limit error types
#[derive(Debug)]
pub enum RateLimitError {
	/// The visitor's bucket is empty
	RateLimited {
		/// Time until the next token is available
		retry_after: Duration,
	},
}

impl RateLimitError {
	/// Retry delay rounded up to whole seconds, never below one
	pub fn retry_after_secs(&self) -> u64 {
		match self {
			RateLimitError::RateLimited { retry_after } => {
				let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
				secs.max(1)
			}
		}
	}
}

impl std::fmt::Display for RateLimitError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			RateLimitError::RateLimited { retry_after } => {
				write!(f, "Rate limited, retry after {:?}", retry_after)
			}
		}
	}
}

impl std::error::Error for RateLimitError {}

impl IntoResponse for RateLimitError {
	fn into_response(self) -> Response {
		let retry_secs = self.retry_after_secs();
		let body = serde_json::json!({
			"error": {
				"code": "E-RATE-LIMITED",
				"message": "Too many requests. Please slow down.",
				"details": {
					"retryAfter": retry_secs
				}
			}
		});

		let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
		if let Ok(val) = retry_secs.to_string().parse() {
			response.headers_mut().insert("Retry-After", val);
		}
		response
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_retry_after_rounds_up() {
		let err = RateLimitError::RateLimited { retry_after: Duration::from_millis(200) };
		assert_eq!(err.retry_after_secs(), 1);
		let err = RateLimitError::RateLimited { retry_after: Duration::from_millis(2100) };
		assert_eq!(err.retry_after_secs(), 3);
		let err = RateLimitError::RateLimited { retry_after: Duration::ZERO };
		assert_eq!(err.retry_after_secs(), 1);
	}

	#[tokio::test]
	async fn test_response_shape() {
		let err = RateLimitError::RateLimited { retry_after: Duration::from_millis(1500) };
		let response = err.into_response();
		assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
		assert_eq!(response.headers().get("retry-after").unwrap(), "2");

		let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
		let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
		assert_eq!(json["error"]["code"], "E-RATE-LIMITED");
		assert_eq!(json["error"]["details"]["retryAfter"], 2);
	}
}

// vim: ts=4
