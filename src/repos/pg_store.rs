/*
 * Responsibility
 * - SnsStore の PostgreSQL 実装
 * - 子の追加/削除 + カウンタ更新を 1 transaction にまとめる
 * - 各 transaction は post 行の FOR UPDATE から始める (aggregate 単位の排他)
 *
 * Early returns drop the transaction without commit, which rolls it back and
 * releases the row lock.
 */
use async_trait::async_trait;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::repos::{
    comment_repo::{self, CommentRow},
    error::{RepoError, RepoResult},
    like_repo::{self, LikeRow},
    post_repo::{self, PostRow},
    store::{LikeOutcome, SnsStore, UnlikeOutcome},
};
use crate::services::counters::ChildEvent;

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Connect, then bring the schema up to date.
    pub async fn connect(database_url: &str, max_connections: u32) -> RepoResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(sqlx::Error::from)?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl SnsStore for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn list_posts(&self) -> RepoResult<Vec<PostRow>> {
        let mut conn = self.pool.acquire().await?;
        post_repo::list(&mut conn).await
    }

    async fn create_post(&self, user_name: &str, content: &str) -> RepoResult<PostRow> {
        let mut conn = self.pool.acquire().await?;
        post_repo::create(&mut conn, user_name, content).await
    }

    async fn get_post(&self, post_id: i64) -> RepoResult<Option<PostRow>> {
        let mut conn = self.pool.acquire().await?;
        post_repo::get(&mut conn, post_id).await
    }

    async fn update_post(&self, post_id: i64, content: &str) -> RepoResult<Option<PostRow>> {
        let mut conn = self.pool.acquire().await?;
        post_repo::update_content(&mut conn, post_id, content).await
    }

    async fn delete_post(&self, post_id: i64) -> RepoResult<bool> {
        let mut tx = self.pool.begin().await?;

        if post_repo::lock(&mut tx, post_id).await?.is_none() {
            return Ok(false);
        }

        // The FK would cascade on its own; deleting explicitly keeps the
        // behavior independent of how the schema was created.
        let likes = like_repo::delete_by_post(&mut tx, post_id).await?;
        let comments = comment_repo::delete_by_post(&mut tx, post_id).await?;
        let deleted = post_repo::delete(&mut tx, post_id).await?;

        tx.commit().await?;

        tracing::debug!(post_id, likes, comments, "post aggregate deleted");
        Ok(deleted)
    }

    async fn reconcile_counts(&self, post_id: i64) -> RepoResult<Option<PostRow>> {
        let mut tx = self.pool.begin().await?;

        if post_repo::lock(&mut tx, post_id).await?.is_none() {
            return Ok(None);
        }
        let row = post_repo::recount_all(&mut tx, post_id).await?;

        tx.commit().await?;
        Ok(row)
    }

    async fn list_comments(&self, post_id: i64) -> RepoResult<Option<Vec<CommentRow>>> {
        let mut tx = self.pool.begin().await?;

        if post_repo::lock_shared(&mut tx, post_id).await?.is_none() {
            return Ok(None);
        }
        let rows = comment_repo::list_by_post(&mut tx, post_id).await?;

        tx.commit().await?;
        Ok(Some(rows))
    }

    async fn create_comment(
        &self,
        post_id: i64,
        user_name: &str,
        content: &str,
    ) -> RepoResult<Option<CommentRow>> {
        let mut tx = self.pool.begin().await?;

        if post_repo::lock(&mut tx, post_id).await?.is_none() {
            return Ok(None);
        }
        let row = comment_repo::create(&mut tx, post_id, user_name, content).await?;
        if post_repo::apply_counter(&mut tx, post_id, ChildEvent::CommentAdded)
            .await?
            .is_none()
        {
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(row))
    }

    async fn get_comment(&self, post_id: i64, comment_id: i64) -> RepoResult<Option<CommentRow>> {
        let mut conn = self.pool.acquire().await?;
        comment_repo::get(&mut conn, post_id, comment_id).await
    }

    async fn update_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        content: &str,
    ) -> RepoResult<Option<CommentRow>> {
        let mut conn = self.pool.acquire().await?;
        comment_repo::update_content(&mut conn, post_id, comment_id, content).await
    }

    async fn delete_comment(&self, post_id: i64, comment_id: i64) -> RepoResult<bool> {
        let mut tx = self.pool.begin().await?;

        if post_repo::lock(&mut tx, post_id).await?.is_none() {
            return Ok(false);
        }
        if !comment_repo::delete(&mut tx, post_id, comment_id).await? {
            return Ok(false);
        }
        post_repo::apply_counter(&mut tx, post_id, ChildEvent::CommentRemoved).await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn list_likes(&self, post_id: i64) -> RepoResult<Option<Vec<LikeRow>>> {
        let mut tx = self.pool.begin().await?;

        if post_repo::lock_shared(&mut tx, post_id).await?.is_none() {
            return Ok(None);
        }
        let rows = like_repo::list_by_post(&mut tx, post_id).await?;

        tx.commit().await?;
        Ok(Some(rows))
    }

    async fn has_liked(&self, post_id: i64, user_name: &str) -> RepoResult<Option<bool>> {
        let mut tx = self.pool.begin().await?;

        if post_repo::lock_shared(&mut tx, post_id).await?.is_none() {
            return Ok(None);
        }
        let liked = like_repo::exists(&mut tx, post_id, user_name).await?;

        tx.commit().await?;
        Ok(Some(liked))
    }

    async fn like(&self, post_id: i64, user_name: &str) -> RepoResult<LikeOutcome> {
        let mut tx = self.pool.begin().await?;

        if post_repo::lock(&mut tx, post_id).await?.is_none() {
            return Ok(LikeOutcome::PostMissing);
        }
        // the failed insert aborts the transaction; dropping it rolls back
        let row = match like_repo::insert(&mut tx, post_id, user_name).await {
            Ok(row) => row,
            Err(RepoError::Conflict) => return Ok(LikeOutcome::AlreadyLiked),
            Err(e) => return Err(e),
        };
        if post_repo::apply_counter(&mut tx, post_id, ChildEvent::LikeAdded)
            .await?
            .is_none()
        {
            return Ok(LikeOutcome::PostMissing);
        }

        tx.commit().await?;
        Ok(LikeOutcome::Liked(row))
    }

    async fn unlike(&self, post_id: i64, user_name: &str) -> RepoResult<UnlikeOutcome> {
        let mut tx = self.pool.begin().await?;

        if post_repo::lock(&mut tx, post_id).await?.is_none() {
            return Ok(UnlikeOutcome::PostMissing);
        }
        if !like_repo::delete(&mut tx, post_id, user_name).await? {
            return Ok(UnlikeOutcome::LikeMissing);
        }
        post_repo::apply_counter(&mut tx, post_id, ChildEvent::LikeRemoved).await?;

        tx.commit().await?;
        Ok(UnlikeOutcome::Unliked)
    }
}
