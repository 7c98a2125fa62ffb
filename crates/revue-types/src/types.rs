//! Review and comment data types

use serde::{Deserialize, Serialize};

/// A video game review with its comment thread
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Review {
	pub title: String,
	pub body: String,
	pub author: String,
	pub comments: Vec<Comment>,
}

impl Review {
	/// Create a review with an empty comment thread
	pub fn new(
		title: impl Into<String>,
		body: impl Into<String>,
		author: impl Into<String>,
	) -> Self {
		Self { title: title.into(), body: body.into(), author: author.into(), comments: Vec::new() }
	}
}

/// A comment on a review
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
	pub body: String,
	pub author: String,
}

impl Comment {
	pub fn new(body: impl Into<String>, author: impl Into<String>) -> Self {
		Self { body: body.into(), author: author.into() }
	}
}

/// Request body for creating a review
///
/// New reviews always start without comments, so the thread is not part of
/// the input.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateReview {
	pub title: String,
	pub body: String,
	pub author: String,
}

impl From<CreateReview> for Review {
	fn from(input: CreateReview) -> Self {
		Review::new(input.title, input.body, input.author)
	}
}

/// Response body for create operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedId {
	pub id: usize,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_review_missing_fields_default() {
		let review: Review = serde_json::from_str(r#"{"author": "me"}"#).unwrap();
		assert_eq!(review.author, "me");
		assert_eq!(review.title, "");
		assert!(review.comments.is_empty());
	}

	#[test]
	fn test_create_review_drops_comments() {
		let input: CreateReview = serde_json::from_str(
			r#"{"title": "t", "body": "b", "author": "a", "comments": [{"body": "x", "author": "y"}]}"#,
		)
		.unwrap();
		let review = Review::from(input);
		assert_eq!(review, Review::new("t", "b", "a"));
	}
}

// vim: ts=4
