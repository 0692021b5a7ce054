/*
 * Responsibility
 * - Posts の request/response DTO
 * - JSON は camelCase (userName, likeCount, ...)
 * - 欠落フィールドは空文字として受け、必須チェックは service に任せる
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::post_repo::PostRow;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: i64,
    pub user_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub like_count: i64,
    pub comment_count: i64,
}

impl From<PostRow> for PostResponse {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.post_id,
            user_name: row.user_name,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
            like_count: row.like_count,
            comment_count: row.comment_count,
        }
    }
}
