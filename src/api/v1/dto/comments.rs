/*
 * Responsibility
 * - Comments の request/response DTO
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::comment_repo::CommentRow;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i64,
    pub post_id: i64,
    pub user_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CommentRow> for CommentResponse {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.comment_id,
            post_id: row.post_id,
            user_name: row.user_name,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
