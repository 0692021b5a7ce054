/*
 * Responsibility
 * - likes テーブル向け SQLx 操作
 * - ("postId", "userName") の複合主キーが一意性の最終防衛線
 */
use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct LikeRow {
    #[sqlx(rename = "postId")]
    pub post_id: i64,

    #[sqlx(rename = "userName")]
    pub user_name: String,

    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

pub async fn list_by_post(conn: &mut PgConnection, post_id: i64) -> RepoResult<Vec<LikeRow>> {
    let rows = sqlx::query_as::<_, LikeRow>(
        r#"
        SELECT "postId", "userName", "createdAt"
        FROM likes
        WHERE "postId" = $1
        ORDER BY "createdAt" ASC, "userName" ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(conn)
    .await?;

    Ok(rows)
}

/// An existing pair fails the primary key and comes back as `RepoError::Conflict`.
pub async fn insert(conn: &mut PgConnection, post_id: i64, user_name: &str) -> RepoResult<LikeRow> {
    let row = sqlx::query_as::<_, LikeRow>(
        r#"
        INSERT INTO likes ("postId", "userName", "createdAt")
        VALUES ($1, $2, now())
        RETURNING "postId", "userName", "createdAt"
        "#,
    )
    .bind(post_id)
    .bind(user_name)
    .fetch_one(conn)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn exists(conn: &mut PgConnection, post_id: i64, user_name: &str) -> RepoResult<bool> {
    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM likes
            WHERE "postId" = $1 AND "userName" = $2
        )
        "#,
    )
    .bind(post_id)
    .bind(user_name)
    .fetch_one(conn)
    .await?;

    Ok(exists)
}

pub async fn delete(conn: &mut PgConnection, post_id: i64, user_name: &str) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM likes
        WHERE "postId" = $1 AND "userName" = $2
        "#,
    )
    .bind(post_id)
    .bind(user_name)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_by_post(conn: &mut PgConnection, post_id: i64) -> RepoResult<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM likes
        WHERE "postId" = $1
        "#,
    )
    .bind(post_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}
