//! Storage interface used by the SNS service.
//!
//! Each method is one unit of work on a single post aggregate (the post plus its
//! comments and likes) and is atomic on its own: implementations serialize work
//! per post (row lock / per-post mutex) and never leave a partial write behind
//! on error. Counter updates follow `services::counters`.
//!
//! Implementations must be cheap to clone (typically `Arc<...>` / pool inside).
use async_trait::async_trait;

use crate::repos::{
    comment_repo::CommentRow, error::RepoResult, like_repo::LikeRow, post_repo::PostRow,
};

/// Result of a like attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LikeOutcome {
    Liked(LikeRow),
    PostMissing,
    AlreadyLiked,
}

/// Result of an unlike attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlikeOutcome {
    Unliked,
    PostMissing,
    LikeMissing,
}

#[async_trait]
pub trait SnsStore: Send + Sync + 'static {
    // Returns the storage backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // Posts, ascending id.
    async fn list_posts(&self) -> RepoResult<Vec<PostRow>>;

    async fn create_post(&self, user_name: &str, content: &str) -> RepoResult<PostRow>;

    async fn get_post(&self, post_id: i64) -> RepoResult<Option<PostRow>>;

    async fn update_post(&self, post_id: i64, content: &str) -> RepoResult<Option<PostRow>>;

    // Delete the post together with all its comments and likes.
    //
    // Returns:
    // - `Ok(true)`  if the post existed and the whole aggregate is gone
    // - `Ok(false)` if there was no such post
    async fn delete_post(&self, post_id: i64) -> RepoResult<bool>;

    // Recompute both counters from the live child rows.
    async fn reconcile_counts(&self, post_id: i64) -> RepoResult<Option<PostRow>>;

    // `Ok(None)` when the post does not exist.
    async fn list_comments(&self, post_id: i64) -> RepoResult<Option<Vec<CommentRow>>>;

    // Insert + `commentCount` increment as one step. `Ok(None)` when the post does not exist.
    async fn create_comment(
        &self,
        post_id: i64,
        user_name: &str,
        content: &str,
    ) -> RepoResult<Option<CommentRow>>;

    // `Ok(None)` when the post or the comment does not exist, or the comment
    // belongs to another post.
    async fn get_comment(&self, post_id: i64, comment_id: i64) -> RepoResult<Option<CommentRow>>;

    async fn update_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        content: &str,
    ) -> RepoResult<Option<CommentRow>>;

    // Delete + `commentCount` recount as one step.
    async fn delete_comment(&self, post_id: i64, comment_id: i64) -> RepoResult<bool>;

    // `Ok(None)` when the post does not exist.
    async fn list_likes(&self, post_id: i64) -> RepoResult<Option<Vec<LikeRow>>>;

    // `Ok(None)` when the post does not exist.
    async fn has_liked(&self, post_id: i64, user_name: &str) -> RepoResult<Option<bool>>;

    // Check-then-insert + `likeCount` increment as one step.
    async fn like(&self, post_id: i64, user_name: &str) -> RepoResult<LikeOutcome>;

    // Delete + `likeCount` decrement as one step.
    async fn unlike(&self, post_id: i64, user_name: &str) -> RepoResult<UnlikeOutcome>;
}
