//! In-memory review adapter
//!
//! Keeps every review in a single `Vec` behind one read/write lock. Writers
//! hold the lock exclusively for the whole operation and readers share it.
//! Comments live inside their review, so the same lock covers both levels.
//! Bounds checks run only after the lock is taken.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

use async_trait::async_trait;
use parking_lot::RwLock;

use revue_types::{
	prelude::*,
	review_adapter::ReviewAdapter,
	types::{Comment, Review},
};

#[derive(Debug, Default)]
pub struct ReviewAdapterMemory {
	reviews: RwLock<Vec<Review>>,
}

impl ReviewAdapterMemory {
	pub fn new() -> Self {
		Self::default()
	}
}

// Helper functions
//******************
fn review(reviews: &[Review], id: usize) -> RvResult<&Review> {
	reviews.get(id).ok_or(Error::ReviewNotFound)
}

fn review_mut(reviews: &mut [Review], id: usize) -> RvResult<&mut Review> {
	reviews.get_mut(id).ok_or(Error::ReviewNotFound)
}

fn comment_mut(review: &mut Review, id: usize) -> RvResult<&mut Comment> {
	review.comments.get_mut(id).ok_or(Error::CommentNotFound)
}

#[async_trait]
impl ReviewAdapter for ReviewAdapterMemory {
	// Reviews
	//*********
	async fn list_reviews(&self) -> RvResult<Vec<Review>> {
		Ok(self.reviews.read().clone())
	}

	async fn create_review(&self, review: Review) -> RvResult<usize> {
		let mut reviews = self.reviews.write();
		reviews.push(review);
		let id = reviews.len() - 1;
		debug!(review_id = id, "Review created");
		Ok(id)
	}

	async fn read_review(&self, id: usize) -> RvResult<Review> {
		let reviews = self.reviews.read();
		review(&reviews, id).cloned()
	}

	async fn update_review(&self, id: usize, review: Review) -> RvResult<()> {
		let mut reviews = self.reviews.write();
		*review_mut(&mut reviews, id)? = review;
		Ok(())
	}

	async fn delete_review(&self, id: usize) -> RvResult<()> {
		let mut reviews = self.reviews.write();
		if id >= reviews.len() {
			return Err(Error::ReviewNotFound);
		}
		let removed = reviews.remove(id);
		debug!(review_id = id, comments = removed.comments.len(), "Review deleted");
		Ok(())
	}

	// Comments
	//**********
	async fn list_comments(&self, review_id: usize) -> RvResult<Vec<Comment>> {
		let reviews = self.reviews.read();
		Ok(review(&reviews, review_id)?.comments.clone())
	}

	async fn create_comment(&self, review_id: usize, comment: Comment) -> RvResult<usize> {
		let mut reviews = self.reviews.write();
		let review = review_mut(&mut reviews, review_id)?;
		review.comments.push(comment);
		let id = review.comments.len() - 1;
		debug!(review_id, comment_id = id, "Comment created");
		Ok(id)
	}

	async fn read_comment(&self, review_id: usize, id: usize) -> RvResult<Comment> {
		let reviews = self.reviews.read();
		review(&reviews, review_id)?.comments.get(id).cloned().ok_or(Error::CommentNotFound)
	}

	async fn update_comment(
		&self,
		review_id: usize,
		id: usize,
		comment: Comment,
	) -> RvResult<()> {
		let mut reviews = self.reviews.write();
		let review = review_mut(&mut reviews, review_id)?;
		*comment_mut(review, id)? = comment;
		Ok(())
	}

	async fn delete_comment(&self, review_id: usize, id: usize) -> RvResult<()> {
		let mut reviews = self.reviews.write();
		let review = review_mut(&mut reviews, review_id)?;
		if id >= review.comments.len() {
			return Err(Error::CommentNotFound);
		}
		review.comments.remove(id);
		debug!(review_id, comment_id = id, "Comment deleted");
		Ok(())
	}
}

// vim: ts=4
