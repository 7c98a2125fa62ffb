//! Review adapter
//!
//! Storage interface for reviews and their comments. Reviews and comments are
//! addressed by position: a review's id is its index in the review list and a
//! comment's id is its index in the parent review's comment list. Deleting an
//! entry shifts the ids of every entry after it down by one.
//!
//! Implementations must be safe to call concurrently. Missing ids are reported
//! as `Error::ReviewNotFound` or `Error::CommentNotFound`; the review check
//! always comes first.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;
use crate::types::{Comment, Review};

#[async_trait]
pub trait ReviewAdapter: Debug + Send + Sync {
	// Reviews
	//*********
	/// Lists all reviews in id order
	async fn list_reviews(&self) -> RvResult<Vec<Review>>;

	/// Appends a review and returns its id
	async fn create_review(&self, review: Review) -> RvResult<usize>;
	async fn read_review(&self, id: usize) -> RvResult<Review>;

	/// Replaces the whole review, including its comment thread
	async fn update_review(&self, id: usize, review: Review) -> RvResult<()>;
	async fn delete_review(&self, id: usize) -> RvResult<()>;

	// Comments
	//**********
	async fn list_comments(&self, review_id: usize) -> RvResult<Vec<Comment>>;
	async fn create_comment(&self, review_id: usize, comment: Comment) -> RvResult<usize>;
	async fn read_comment(&self, review_id: usize, id: usize) -> RvResult<Comment>;
	async fn update_comment(&self, review_id: usize, id: usize, comment: Comment)
	-> RvResult<()>;
	async fn delete_comment(&self, review_id: usize, id: usize) -> RvResult<()>;
}

// vim: ts=4
