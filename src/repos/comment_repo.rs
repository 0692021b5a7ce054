/*
 * Responsibility
 * - comments テーブル向け SQLx 操作
 * - すべての参照は "postId" でスコープする (他 post の comment は存在しない扱い)
 */
use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CommentRow {
    #[sqlx(rename = "commentId")]
    pub comment_id: i64,

    #[sqlx(rename = "postId")]
    pub post_id: i64,

    #[sqlx(rename = "userName")]
    pub user_name: String,

    pub content: String,

    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

pub async fn list_by_post(conn: &mut PgConnection, post_id: i64) -> RepoResult<Vec<CommentRow>> {
    let rows = sqlx::query_as::<_, CommentRow>(
        r#"
        SELECT "commentId", "postId", "userName", content, "createdAt", "updatedAt"
        FROM comments
        WHERE "postId" = $1
        ORDER BY "commentId" ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(conn)
    .await?;

    Ok(rows)
}

pub async fn create(
    conn: &mut PgConnection,
    post_id: i64,
    user_name: &str,
    content: &str,
) -> RepoResult<CommentRow> {
    let row = sqlx::query_as::<_, CommentRow>(
        r#"
        INSERT INTO comments ("postId", "userName", content, "createdAt", "updatedAt")
        VALUES ($1, $2, $3, now(), now())
        RETURNING "commentId", "postId", "userName", content, "createdAt", "updatedAt"
        "#,
    )
    .bind(post_id)
    .bind(user_name)
    .bind(content)
    .fetch_one(conn)
    .await?;

    Ok(row)
}

pub async fn get(
    conn: &mut PgConnection,
    post_id: i64,
    comment_id: i64,
) -> RepoResult<Option<CommentRow>> {
    let row = sqlx::query_as::<_, CommentRow>(
        r#"
        SELECT "commentId", "postId", "userName", content, "createdAt", "updatedAt"
        FROM comments
        WHERE "commentId" = $1 AND "postId" = $2
        "#,
    )
    .bind(comment_id)
    .bind(post_id)
    .fetch_optional(conn)
    .await?;

    Ok(row)
}

pub async fn update_content(
    conn: &mut PgConnection,
    post_id: i64,
    comment_id: i64,
    content: &str,
) -> RepoResult<Option<CommentRow>> {
    let row = sqlx::query_as::<_, CommentRow>(
        r#"
        UPDATE comments
        SET
            content = $3,
            "updatedAt" = now()
        WHERE "commentId" = $1 AND "postId" = $2
        RETURNING "commentId", "postId", "userName", content, "createdAt", "updatedAt"
        "#,
    )
    .bind(comment_id)
    .bind(post_id)
    .bind(content)
    .fetch_optional(conn)
    .await?;

    Ok(row)
}

pub async fn delete(conn: &mut PgConnection, post_id: i64, comment_id: i64) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM comments
        WHERE "commentId" = $1 AND "postId" = $2
        "#,
    )
    .bind(comment_id)
    .bind(post_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_by_post(conn: &mut PgConnection, post_id: i64) -> RepoResult<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM comments
        WHERE "postId" = $1
        "#,
    )
    .bind(post_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}
