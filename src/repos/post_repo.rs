/*
 * Responsibility
 * - posts テーブル向け SQLx 操作
 * - 行ロック (FOR UPDATE / FOR SHARE) で aggregate 単位の排他を取る
 * - likeCount / commentCount の更新は counters の戦略に従う
 *
 * All functions take a `&mut PgConnection` so callers can run them inside a
 * transaction (`&mut *tx`) or on a pooled connection (`&mut *conn`).
 */
use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use crate::repos::error::RepoResult;
use crate::services::counters::{ChildEvent, Counter, CounterUpdate};

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PostRow {
    #[sqlx(rename = "postId")]
    pub post_id: i64,

    #[sqlx(rename = "userName")]
    pub user_name: String,

    pub content: String,

    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,

    #[sqlx(rename = "likeCount")]
    pub like_count: i64,

    #[sqlx(rename = "commentCount")]
    pub comment_count: i64,
}

const POST_COLUMNS: &str =
    r#""postId", "userName", content, "createdAt", "updatedAt", "likeCount", "commentCount""#;

pub async fn list(conn: &mut PgConnection) -> RepoResult<Vec<PostRow>> {
    let rows = sqlx::query_as::<_, PostRow>(&format!(
        r#"
        SELECT {POST_COLUMNS}
        FROM posts
        ORDER BY "postId" ASC
        "#
    ))
    .fetch_all(conn)
    .await?;

    Ok(rows)
}

pub async fn create(
    conn: &mut PgConnection,
    user_name: &str,
    content: &str,
) -> RepoResult<PostRow> {
    let row = sqlx::query_as::<_, PostRow>(&format!(
        r#"
        INSERT INTO posts
            ("userName", content, "createdAt", "updatedAt", "likeCount", "commentCount")
        VALUES ($1, $2, now(), now(), 0, 0)
        RETURNING {POST_COLUMNS}
        "#
    ))
    .bind(user_name)
    .bind(content)
    .fetch_one(conn)
    .await?;

    Ok(row)
}

pub async fn get(conn: &mut PgConnection, post_id: i64) -> RepoResult<Option<PostRow>> {
    let row = sqlx::query_as::<_, PostRow>(&format!(
        r#"
        SELECT {POST_COLUMNS}
        FROM posts
        WHERE "postId" = $1
        "#
    ))
    .bind(post_id)
    .fetch_optional(conn)
    .await?;

    Ok(row)
}

/// Exclusive row lock on the aggregate root. Held until the surrounding
/// transaction ends; every child mutation of the post goes through here first.
pub async fn lock(conn: &mut PgConnection, post_id: i64) -> RepoResult<Option<PostRow>> {
    let row = sqlx::query_as::<_, PostRow>(&format!(
        r#"
        SELECT {POST_COLUMNS}
        FROM posts
        WHERE "postId" = $1
        FOR UPDATE
        "#
    ))
    .bind(post_id)
    .fetch_optional(conn)
    .await?;

    Ok(row)
}

/// Shared row lock: readers of the child collections block a concurrent cascade
/// delete, but not each other.
pub async fn lock_shared(conn: &mut PgConnection, post_id: i64) -> RepoResult<Option<PostRow>> {
    let row = sqlx::query_as::<_, PostRow>(&format!(
        r#"
        SELECT {POST_COLUMNS}
        FROM posts
        WHERE "postId" = $1
        FOR SHARE
        "#
    ))
    .bind(post_id)
    .fetch_optional(conn)
    .await?;

    Ok(row)
}

pub async fn update_content(
    conn: &mut PgConnection,
    post_id: i64,
    content: &str,
) -> RepoResult<Option<PostRow>> {
    let row = sqlx::query_as::<_, PostRow>(&format!(
        r#"
        UPDATE posts
        SET
            content = $2,
            "updatedAt" = now()
        WHERE "postId" = $1
        RETURNING {POST_COLUMNS}
        "#
    ))
    .bind(post_id)
    .bind(content)
    .fetch_optional(conn)
    .await?;

    Ok(row)
}

/// Apply the counter strategy for `event` and stamp `updatedAt`.
pub async fn apply_counter(
    conn: &mut PgConnection,
    post_id: i64,
    event: ChildEvent,
) -> RepoResult<Option<PostRow>> {
    let counter = event.counter();
    let expr = event.update().sql_expr(counter);

    let row = sqlx::query_as::<_, PostRow>(&format!(
        r#"
        UPDATE posts
        SET
            {column} = {expr},
            "updatedAt" = now()
        WHERE "postId" = $1
        RETURNING {POST_COLUMNS}
        "#,
        column = counter.column(),
    ))
    .bind(post_id)
    .fetch_optional(conn)
    .await?;

    Ok(row)
}

/// Recompute both counters from the live child rows.
pub async fn recount_all(conn: &mut PgConnection, post_id: i64) -> RepoResult<Option<PostRow>> {
    let assignments = Counter::ALL
        .iter()
        .map(|c| format!("{} = {}", c.column(), CounterUpdate::Recount.sql_expr(*c)))
        .collect::<Vec<_>>()
        .join(", ");

    let row = sqlx::query_as::<_, PostRow>(&format!(
        r#"
        UPDATE posts
        SET
            {assignments},
            "updatedAt" = now()
        WHERE "postId" = $1
        RETURNING {POST_COLUMNS}
        "#
    ))
    .bind(post_id)
    .fetch_optional(conn)
    .await?;

    Ok(row)
}

pub async fn delete(conn: &mut PgConnection, post_id: i64) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM posts
        WHERE "postId" = $1
        "#,
    )
    .bind(post_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}
