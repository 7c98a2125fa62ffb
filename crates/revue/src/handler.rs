//! Review and comment handlers

use std::num::IntErrorKind;

use axum::{
	Json,
	body::Bytes,
	extract::{Path, State, rejection::BytesRejection},
	http::{StatusCode, Uri},
	response::IntoResponse,
};
use serde::de::DeserializeOwned;

use crate::prelude::*;
use crate::types::{Comment, CreateReview, CreatedId, Review};

/// Decode a JSON request body, mapping every failure to a 400
fn parse_body<T: DeserializeOwned>(body: Result<Bytes, BytesRejection>) -> RvResult<T> {
	let body = body.map_err(|e| Error::ValidationError(e.body_text()))?;
	serde_json::from_slice(&body).map_err(|e| Error::ValidationError(e.to_string()))
}

/// Non-numeric ids are malformed requests; negative or out of range ids
/// simply do not exist
fn parse_id(raw: &str, not_found: Error) -> RvResult<usize> {
	let id: i64 = match raw.trim().parse() {
		Ok(id) => id,
		Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
			return Err(not_found);
		}
		Err(_) => return Err(Error::ValidationError(format!("invalid id: {}", raw))),
	};
	usize::try_from(id).map_err(|_| not_found)
}

fn review_id(raw: &str) -> RvResult<usize> {
	parse_id(raw, Error::ReviewNotFound)
}

fn comment_id(raw: &str) -> RvResult<usize> {
	parse_id(raw, Error::CommentNotFound)
}

// Reviews
//*********

/// GET /reviews
pub async fn list_reviews(State(app): State<App>) -> RvResult<Json<Vec<Review>>> {
	Ok(Json(app.review_adapter.list_reviews().await?))
}

/// POST /reviews
pub async fn post_review(
	State(app): State<App>,
	body: Result<Bytes, BytesRejection>,
) -> RvResult<Json<CreatedId>> {
	let input: CreateReview = parse_body(body)?;
	let id = app.review_adapter.create_review(input.into()).await?;
	info!(review_id = id, "Review created");
	Ok(Json(CreatedId { id }))
}

/// GET /reviews/{review_id}
pub async fn get_review(
	State(app): State<App>,
	Path(id): Path<String>,
) -> RvResult<Json<Review>> {
	let id = review_id(&id)?;
	Ok(Json(app.review_adapter.read_review(id).await?))
}

/// PUT /reviews/{review_id} - Replace the whole review, comment thread included
pub async fn put_review(
	State(app): State<App>,
	Path(id): Path<String>,
	body: Result<Bytes, BytesRejection>,
) -> RvResult<StatusCode> {
	let id = review_id(&id)?;
	let review: Review = parse_body(body)?;
	app.review_adapter.update_review(id, review).await?;
	Ok(StatusCode::NO_CONTENT)
}

/// DELETE /reviews/{review_id}
pub async fn delete_review(
	State(app): State<App>,
	Path(id): Path<String>,
) -> RvResult<StatusCode> {
	let id = review_id(&id)?;
	app.review_adapter.delete_review(id).await?;
	info!(review_id = id, "Review deleted");
	Ok(StatusCode::NO_CONTENT)
}

// Comments
//**********

/// GET /reviews/{review_id}/comments
pub async fn list_comments(
	State(app): State<App>,
	Path(rid): Path<String>,
) -> RvResult<Json<Vec<Comment>>> {
	let rid = review_id(&rid)?;
	Ok(Json(app.review_adapter.list_comments(rid).await?))
}

/// POST /reviews/{review_id}/comments
pub async fn post_comment(
	State(app): State<App>,
	Path(rid): Path<String>,
	body: Result<Bytes, BytesRejection>,
) -> RvResult<Json<CreatedId>> {
	let rid = review_id(&rid)?;
	let comment: Comment = parse_body(body)?;
	let id = app.review_adapter.create_comment(rid, comment).await?;
	info!(review_id = rid, comment_id = id, "Comment created");
	Ok(Json(CreatedId { id }))
}

/// GET /reviews/{review_id}/comments/{comment_id}
pub async fn get_comment(
	State(app): State<App>,
	Path((rid, id)): Path<(String, String)>,
) -> RvResult<Json<Comment>> {
	let rid = review_id(&rid)?;
	let id = comment_id(&id)?;
	Ok(Json(app.review_adapter.read_comment(rid, id).await?))
}

/// PUT /reviews/{review_id}/comments/{comment_id}
pub async fn put_comment(
	State(app): State<App>,
	Path((rid, id)): Path<(String, String)>,
	body: Result<Bytes, BytesRejection>,
) -> RvResult<StatusCode> {
	let rid = review_id(&rid)?;
	let id = comment_id(&id)?;
	let comment: Comment = parse_body(body)?;
	app.review_adapter.update_comment(rid, id, comment).await?;
	Ok(StatusCode::NO_CONTENT)
}

/// DELETE /reviews/{review_id}/comments/{comment_id}
pub async fn delete_comment(
	State(app): State<App>,
	Path((rid, id)): Path<(String, String)>,
) -> RvResult<StatusCode> {
	let rid = review_id(&rid)?;
	let id = comment_id(&id)?;
	app.review_adapter.delete_comment(rid, id).await?;
	info!(review_id = rid, comment_id = id, "Comment deleted");
	Ok(StatusCode::NO_CONTENT)
}

// Misc
//******

/// GET /healthz
pub async fn health() -> impl IntoResponse {
	Json(serde_json::json!({ "status": "ok" }))
}

/// Fallback for routes that do not exist
pub async fn not_found(uri: Uri) -> impl IntoResponse {
	let body = serde_json::json!({
		"error": {
			"code": "E-NOT-FOUND",
			"message": format!("Route '{}' does not exist", uri.path()),
		}
	});
	(StatusCode::NOT_FOUND, Json(body))
}


// vim: ts=4
