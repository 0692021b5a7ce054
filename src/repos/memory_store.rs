/*
 * Responsibility
 * - SnsStore のインメモリ実装 (開発用 / テスト用)
 * - post ごとに Mutex を持ち、aggregate 単位で排他する
 * - 別 post の操作は並行に進められる
 *
 * Locking order: an aggregate lock may be held while taking the index lock,
 * never the other way around (index guards are dropped before any aggregate
 * lock is awaited).
 */
use std::collections::BTreeMap;
use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};

use crate::repos::{
    comment_repo::CommentRow,
    error::RepoResult,
    like_repo::LikeRow,
    post_repo::PostRow,
    store::{LikeOutcome, SnsStore, UnlikeOutcome},
};
use crate::services::counters::{ChildEvent, Counter, CounterUpdate};

#[derive(Debug)]
struct Aggregate {
    post: PostRow,
    comments: BTreeMap<i64, CommentRow>,
    // insertion order
    likes: Vec<LikeRow>,
    // cleared by delete_post; a waiter that gets the lock afterwards sees NotFound
    live: bool,
}

impl Aggregate {
    fn live_count(&self, counter: Counter) -> i64 {
        match counter {
            Counter::Likes => self.likes.len() as i64,
            Counter::Comments => self.comments.len() as i64,
        }
    }

    fn apply(&mut self, event: ChildEvent) {
        let counter = event.counter();
        let live = self.live_count(counter);
        let slot = match counter {
            Counter::Likes => &mut self.post.like_count,
            Counter::Comments => &mut self.post.comment_count,
        };
        *slot = event.update().apply(*slot, || live);
        self.post.updated_at = Utc::now();
    }

    fn recount_all(&mut self) {
        self.post.like_count = CounterUpdate::Recount.apply(self.post.like_count, || {
            self.likes.len() as i64
        });
        self.post.comment_count = CounterUpdate::Recount
            .apply(self.post.comment_count, || self.comments.len() as i64);
        self.post.updated_at = Utc::now();
    }
}

type Slot = Arc<Mutex<Aggregate>>;

#[derive(Debug, Default)]
struct Inner {
    posts: RwLock<BTreeMap<i64, Slot>>,
    next_post_id: AtomicI64,
    next_comment_id: AtomicI64,
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn slot(&self, post_id: i64) -> Option<Slot> {
        self.inner.posts.read().await.get(&post_id).cloned()
    }

    fn next_post_id(&self) -> i64 {
        self.inner.next_post_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn next_comment_id(&self) -> i64 {
        self.inner.next_comment_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

// Lock the aggregate for `post_id`, or return `$missing` if it is gone.
macro_rules! lock_live {
    ($store:expr, $post_id:expr, $missing:expr) => {{
        let Some(slot) = $store.slot($post_id).await else {
            return Ok($missing);
        };
        let guard = slot.lock_owned().await;
        if !guard.live {
            return Ok($missing);
        }
        guard
    }};
}

#[async_trait]
impl SnsStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list_posts(&self) -> RepoResult<Vec<PostRow>> {
        let slots: Vec<Slot> = self.inner.posts.read().await.values().cloned().collect();

        let mut rows = Vec::with_capacity(slots.len());
        for slot in slots {
            let agg = slot.lock().await;
            if agg.live {
                rows.push(agg.post.clone());
            }
        }
        Ok(rows)
    }

    async fn create_post(&self, user_name: &str, content: &str) -> RepoResult<PostRow> {
        let now = Utc::now();
        let mut posts = self.inner.posts.write().await;

        // id is taken under the index lock so ids enter the map in ascending order
        let post = PostRow {
            post_id: self.next_post_id(),
            user_name: user_name.to_string(),
            content: content.to_string(),
            created_at: now,
            updated_at: now,
            like_count: 0,
            comment_count: 0,
        };
        posts.insert(
            post.post_id,
            Arc::new(Mutex::new(Aggregate {
                post: post.clone(),
                comments: BTreeMap::new(),
                likes: Vec::new(),
                live: true,
            })),
        );

        Ok(post)
    }

    async fn get_post(&self, post_id: i64) -> RepoResult<Option<PostRow>> {
        let agg = lock_live!(self, post_id, None);
        Ok(Some(agg.post.clone()))
    }

    async fn update_post(&self, post_id: i64, content: &str) -> RepoResult<Option<PostRow>> {
        let mut agg = lock_live!(self, post_id, None);
        agg.post.content = content.to_string();
        agg.post.updated_at = Utc::now();
        Ok(Some(agg.post.clone()))
    }

    async fn delete_post(&self, post_id: i64) -> RepoResult<bool> {
        let mut agg = lock_live!(self, post_id, false);

        agg.live = false;
        let comments = agg.comments.len();
        let likes = agg.likes.len();
        agg.comments.clear();
        agg.likes.clear();
        self.inner.posts.write().await.remove(&post_id);

        tracing::debug!(post_id, likes, comments, "post aggregate deleted");
        Ok(true)
    }

    async fn reconcile_counts(&self, post_id: i64) -> RepoResult<Option<PostRow>> {
        let mut agg = lock_live!(self, post_id, None);
        agg.recount_all();
        Ok(Some(agg.post.clone()))
    }

    async fn list_comments(&self, post_id: i64) -> RepoResult<Option<Vec<CommentRow>>> {
        let agg = lock_live!(self, post_id, None);
        Ok(Some(agg.comments.values().cloned().collect()))
    }

    async fn create_comment(
        &self,
        post_id: i64,
        user_name: &str,
        content: &str,
    ) -> RepoResult<Option<CommentRow>> {
        let mut agg = lock_live!(self, post_id, None);

        let now = Utc::now();
        let row = CommentRow {
            comment_id: self.next_comment_id(),
            post_id,
            user_name: user_name.to_string(),
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        };
        agg.comments.insert(row.comment_id, row.clone());
        agg.apply(ChildEvent::CommentAdded);

        Ok(Some(row))
    }

    async fn get_comment(&self, post_id: i64, comment_id: i64) -> RepoResult<Option<CommentRow>> {
        let agg = lock_live!(self, post_id, None);
        Ok(agg.comments.get(&comment_id).cloned())
    }

    async fn update_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        content: &str,
    ) -> RepoResult<Option<CommentRow>> {
        let mut agg = lock_live!(self, post_id, None);

        let Some(comment) = agg.comments.get_mut(&comment_id) else {
            return Ok(None);
        };
        comment.content = content.to_string();
        comment.updated_at = Utc::now();
        Ok(Some(comment.clone()))
    }

    async fn delete_comment(&self, post_id: i64, comment_id: i64) -> RepoResult<bool> {
        let mut agg = lock_live!(self, post_id, false);

        if agg.comments.remove(&comment_id).is_none() {
            return Ok(false);
        }
        agg.apply(ChildEvent::CommentRemoved);
        Ok(true)
    }

    async fn list_likes(&self, post_id: i64) -> RepoResult<Option<Vec<LikeRow>>> {
        let agg = lock_live!(self, post_id, None);
        Ok(Some(agg.likes.clone()))
    }

    async fn has_liked(&self, post_id: i64, user_name: &str) -> RepoResult<Option<bool>> {
        let agg = lock_live!(self, post_id, None);
        Ok(Some(agg.likes.iter().any(|l| l.user_name == user_name)))
    }

    async fn like(&self, post_id: i64, user_name: &str) -> RepoResult<LikeOutcome> {
        let mut agg = lock_live!(self, post_id, LikeOutcome::PostMissing);

        if agg.likes.iter().any(|l| l.user_name == user_name) {
            return Ok(LikeOutcome::AlreadyLiked);
        }
        let row = LikeRow {
            post_id,
            user_name: user_name.to_string(),
            created_at: Utc::now(),
        };
        agg.likes.push(row.clone());
        agg.apply(ChildEvent::LikeAdded);

        Ok(LikeOutcome::Liked(row))
    }

    async fn unlike(&self, post_id: i64, user_name: &str) -> RepoResult<UnlikeOutcome> {
        let mut agg = lock_live!(self, post_id, UnlikeOutcome::PostMissing);

        let Some(pos) = agg.likes.iter().position(|l| l.user_name == user_name) else {
            return Ok(UnlikeOutcome::LikeMissing);
        };
        agg.likes.remove(pos);
        agg.apply(ChildEvent::LikeRemoved);

        Ok(UnlikeOutcome::Unliked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ids_are_monotonic_and_posts_list_ascending() {
        let store = MemoryStore::new();
        let a = store.create_post("alice", "one").await.unwrap();
        let b = store.create_post("bob", "two").await.unwrap();
        assert!(a.post_id < b.post_id);

        let ids: Vec<i64> = store
            .list_posts()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.post_id)
            .collect();
        assert_eq!(ids, vec![a.post_id, b.post_id]);
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let store = MemoryStore::new();
        let a = store.create_post("alice", "one").await.unwrap();
        assert!(store.delete_post(a.post_id).await.unwrap());
        let b = store.create_post("alice", "two").await.unwrap();
        assert!(b.post_id > a.post_id);
    }

    #[tokio::test]
    async fn comment_from_other_post_is_invisible() {
        let store = MemoryStore::new();
        let p1 = store.create_post("alice", "one").await.unwrap();
        let p2 = store.create_post("bob", "two").await.unwrap();
        let c = store
            .create_comment(p1.post_id, "carol", "hi")
            .await
            .unwrap()
            .unwrap();

        assert!(store.get_comment(p2.post_id, c.comment_id).await.unwrap().is_none());
        assert!(
            store
                .update_comment(p2.post_id, c.comment_id, "x")
                .await
                .unwrap()
                .is_none()
        );
        assert!(!store.delete_comment(p2.post_id, c.comment_id).await.unwrap());
        assert_eq!(
            store.get_post(p1.post_id).await.unwrap().unwrap().comment_count,
            1
        );
    }

    #[tokio::test]
    async fn operations_on_missing_post_report_missing() {
        let store = MemoryStore::new();
        assert!(!store.delete_post(99).await.unwrap());
        assert_eq!(
            store.unlike(99, "bob").await.unwrap(),
            UnlikeOutcome::PostMissing
        );
        assert_eq!(
            store.like(99, "bob").await.unwrap(),
            LikeOutcome::PostMissing
        );
    }

    #[tokio::test]
    async fn reconcile_repairs_drifted_counters() {
        let store = MemoryStore::new();
        let p = store.create_post("alice", "hello").await.unwrap();
        store.like(p.post_id, "bob").await.unwrap();
        store
            .create_comment(p.post_id, "bob", "hi")
            .await
            .unwrap()
            .unwrap();

        // simulate drift
        {
            let slot = store.slot(p.post_id).await.unwrap();
            let mut agg = slot.lock().await;
            agg.post.like_count = 7;
            agg.post.comment_count = 0;
        }

        let fixed = store.reconcile_counts(p.post_id).await.unwrap().unwrap();
        assert_eq!(fixed.like_count, 1);
        assert_eq!(fixed.comment_count, 1);
    }

    #[tokio::test]
    async fn comment_delete_recount_heals_drift() {
        let store = MemoryStore::new();
        let p = store.create_post("alice", "hello").await.unwrap();
        let c1 = store
            .create_comment(p.post_id, "bob", "one")
            .await
            .unwrap()
            .unwrap();
        store
            .create_comment(p.post_id, "bob", "two")
            .await
            .unwrap()
            .unwrap();

        {
            let slot = store.slot(p.post_id).await.unwrap();
            slot.lock().await.post.comment_count = 10;
        }

        assert!(store.delete_comment(p.post_id, c1.comment_id).await.unwrap());
        let post = store.get_post(p.post_id).await.unwrap().unwrap();
        assert_eq!(post.comment_count, 1);
    }
}
