/*
 * Responsibility
 * - posts / comments / likes のユースケース (handler から呼ばれる唯一の入口)
 * - 入力検証 (必須・空文字) → store 呼び出し → 結果を型付きエラーへ
 * - store の実装 (Postgres / memory) には依存しない
 *
 * Shape is checked before existence: an empty field on a missing post is
 * InvalidInput, not NotFound.
 */
use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::repos::{
    comment_repo::CommentRow,
    error::RepoError,
    like_repo::LikeRow,
    post_repo::PostRow,
    store::{LikeOutcome, SnsStore, UnlikeOutcome},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Post,
    Comment,
    Like,
}

impl Resource {
    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Post => "post",
            Resource::Comment => "comment",
            Resource::Like => "like",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum SnsError {
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("{0} not found")]
    NotFound(Resource),
    #[error("post already liked by this user")]
    Conflict,
    #[error("store error")]
    Store(#[from] RepoError),
}

pub type SnsResult<T> = Result<T, SnsError>;

fn required<'a>(value: &'a str, message: &'static str) -> SnsResult<&'a str> {
    if value.trim().is_empty() {
        return Err(SnsError::InvalidInput(message));
    }
    Ok(value)
}

#[derive(Clone)]
pub struct SnsService {
    store: Arc<dyn SnsStore>,
}

impl fmt::Debug for SnsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnsService")
            .field("store", &self.store.backend_name())
            .finish()
    }
}

impl SnsService {
    pub fn new(store: Arc<dyn SnsStore>) -> Self {
        Self { store }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    // --- posts ---

    pub async fn list_posts(&self) -> SnsResult<Vec<PostRow>> {
        Ok(self.store.list_posts().await?)
    }

    pub async fn create_post(&self, user_name: &str, content: &str) -> SnsResult<PostRow> {
        let user_name = required(user_name, "userName is required")?;
        let content = required(content, "content is required")?;

        let post = self.store.create_post(user_name, content).await?;
        tracing::info!(post_id = post.post_id, "post created");
        Ok(post)
    }

    pub async fn get_post(&self, post_id: i64) -> SnsResult<PostRow> {
        self.store
            .get_post(post_id)
            .await?
            .ok_or(SnsError::NotFound(Resource::Post))
    }

    pub async fn update_post(&self, post_id: i64, content: &str) -> SnsResult<PostRow> {
        let content = required(content, "content cannot be empty")?;

        self.store
            .update_post(post_id, content)
            .await?
            .ok_or(SnsError::NotFound(Resource::Post))
    }

    pub async fn delete_post(&self, post_id: i64) -> SnsResult<()> {
        if !self.store.delete_post(post_id).await? {
            return Err(SnsError::NotFound(Resource::Post));
        }
        tracing::info!(post_id, "post deleted");
        Ok(())
    }

    pub async fn reconcile_counts(&self, post_id: i64) -> SnsResult<PostRow> {
        let post = self
            .store
            .reconcile_counts(post_id)
            .await?
            .ok_or(SnsError::NotFound(Resource::Post))?;
        tracing::info!(
            post_id,
            like_count = post.like_count,
            comment_count = post.comment_count,
            "post counters reconciled"
        );
        Ok(post)
    }

    // --- comments ---

    pub async fn list_comments(&self, post_id: i64) -> SnsResult<Vec<CommentRow>> {
        self.store
            .list_comments(post_id)
            .await?
            .ok_or(SnsError::NotFound(Resource::Post))
    }

    pub async fn create_comment(
        &self,
        post_id: i64,
        user_name: &str,
        content: &str,
    ) -> SnsResult<CommentRow> {
        let user_name = required(user_name, "userName is required")?;
        let content = required(content, "content is required")?;

        let comment = self
            .store
            .create_comment(post_id, user_name, content)
            .await?
            .ok_or(SnsError::NotFound(Resource::Post))?;
        tracing::info!(post_id, comment_id = comment.comment_id, "comment created");
        Ok(comment)
    }

    pub async fn get_comment(&self, post_id: i64, comment_id: i64) -> SnsResult<CommentRow> {
        self.store
            .get_comment(post_id, comment_id)
            .await?
            .ok_or(SnsError::NotFound(Resource::Comment))
    }

    pub async fn update_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        content: &str,
    ) -> SnsResult<CommentRow> {
        let content = required(content, "content cannot be empty")?;

        self.store
            .update_comment(post_id, comment_id, content)
            .await?
            .ok_or(SnsError::NotFound(Resource::Comment))
    }

    pub async fn delete_comment(&self, post_id: i64, comment_id: i64) -> SnsResult<()> {
        if !self.store.delete_comment(post_id, comment_id).await? {
            return Err(SnsError::NotFound(Resource::Comment));
        }
        tracing::info!(post_id, comment_id, "comment deleted");
        Ok(())
    }

    // --- likes ---

    pub async fn list_likes(&self, post_id: i64) -> SnsResult<Vec<LikeRow>> {
        self.store
            .list_likes(post_id)
            .await?
            .ok_or(SnsError::NotFound(Resource::Post))
    }

    pub async fn has_liked(&self, post_id: i64, user_name: &str) -> SnsResult<bool> {
        let user_name = required(user_name, "userName is required")?;

        self.store
            .has_liked(post_id, user_name)
            .await?
            .ok_or(SnsError::NotFound(Resource::Post))
    }

    pub async fn like_post(&self, post_id: i64, user_name: &str) -> SnsResult<LikeRow> {
        let user_name = required(user_name, "userName is required")?;

        match self.store.like(post_id, user_name).await? {
            LikeOutcome::Liked(like) => {
                tracing::info!(post_id, "post liked");
                Ok(like)
            }
            LikeOutcome::PostMissing => Err(SnsError::NotFound(Resource::Post)),
            LikeOutcome::AlreadyLiked => Err(SnsError::Conflict),
        }
    }

    pub async fn unlike_post(&self, post_id: i64, user_name: &str) -> SnsResult<()> {
        let user_name = required(user_name, "userName is required")?;

        match self.store.unlike(post_id, user_name).await? {
            UnlikeOutcome::Unliked => {
                tracing::info!(post_id, "post unliked");
                Ok(())
            }
            UnlikeOutcome::PostMissing => Err(SnsError::NotFound(Resource::Post)),
            UnlikeOutcome::LikeMissing => Err(SnsError::NotFound(Resource::Like)),
        }
    }
}
