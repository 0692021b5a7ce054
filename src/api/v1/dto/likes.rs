/*
 * Responsibility
 * - Likes の request/response DTO
 * - like/unlike はどちらも body の userName で対象を指定する
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::like_repo::LikeRow;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    #[serde(default)]
    pub user_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub post_id: i64,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<LikeRow> for LikeResponse {
    fn from(row: LikeRow) -> Self {
        Self {
            post_id: row.post_id,
            user_name: row.user_name,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LikedResponse {
    pub liked: bool,
}
