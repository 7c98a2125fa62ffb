//! Error type shared by the store adapters and the HTTP layer.

use axum::{Json, http::StatusCode, response::IntoResponse};

pub type RvResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// Review id outside the current review sequence
	ReviewNotFound,
	/// Comment id outside the parent review's comment sequence
	CommentNotFound,
	ValidationError(String),
	Internal(String),

	// externals
	Io(std::io::Error),
}

impl Error {
	/// Machine-readable error code used in response bodies
	pub fn code(&self) -> &'static str {
		match self {
			Error::ReviewNotFound => "E-REVIEW-NOT-FOUND",
			Error::CommentNotFound => "E-COMMENT-NOT-FOUND",
			Error::ValidationError(_) => "E-VALIDATION",
			Error::Internal(_) | Error::Io(_) => "E-INTERNAL",
		}
	}

	pub fn status(&self) -> StatusCode {
		match self {
			Error::ReviewNotFound | Error::CommentNotFound => StatusCode::NOT_FOUND,
			Error::ValidationError(_) => StatusCode::BAD_REQUEST,
			Error::Internal(_) | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::ReviewNotFound => write!(f, "Review not found"),
			Error::CommentNotFound => write!(f, "Comment not found"),
			Error::ValidationError(msg) => write!(f, "Validation error: {}", msg),
			Error::Internal(msg) => write!(f, "Internal error: {}", msg),
			Error::Io(err) => write!(f, "Io error: {}", err),
		}
	}
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
	fn into_response(self) -> axum::response::Response {
		let status = self.status();
		// Internal details stay in the log, not in the response
		let message = match &self {
			Error::Internal(_) | Error::Io(_) => {
				tracing::error!(error = %self, "Request failed");
				"Internal server error".to_string()
			}
			_ => self.to_string(),
		};
		let body = serde_json::json!({
			"error": {
				"code": self.code(),
				"message": message,
			}
		});
		(status, Json(body)).into_response()
	}
}


// vim: ts=4
