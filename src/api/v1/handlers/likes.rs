/*
 * Responsibility
 * - /posts/{post_id}/likes 系 handler
 * - 二重 like は 409、存在しない like の取り消しは 404
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    api::v1::{
        dto::likes::{LikeRequest, LikeResponse, LikedResponse},
        extractors::{json_body::JsonBody, path_id::PostId},
    },
    error::AppError,
    state::AppState,
};

// Only the user segment; {post_id} is read by `PostId`.
#[derive(Debug, Deserialize)]
pub struct LikeUserPath {
    pub user_name: String,
}

pub async fn list_likes(
    State(state): State<AppState>,
    post_id: PostId,
) -> Result<Json<Vec<LikeResponse>>, AppError> {
    let rows = state.sns.list_likes(post_id.id).await?;
    Ok(Json(rows.into_iter().map(LikeResponse::from).collect()))
}

pub async fn like_post(
    State(state): State<AppState>,
    post_id: PostId,
    JsonBody(req): JsonBody<LikeRequest>,
) -> Result<(StatusCode, Json<LikeResponse>), AppError> {
    let row = state.sns.like_post(post_id.id, &req.user_name).await?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn unlike_post(
    State(state): State<AppState>,
    post_id: PostId,
    JsonBody(req): JsonBody<LikeRequest>,
) -> Result<StatusCode, AppError> {
    state.sns.unlike_post(post_id.id, &req.user_name).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn has_liked(
    State(state): State<AppState>,
    post_id: PostId,
    Path(path): Path<LikeUserPath>,
) -> Result<Json<LikedResponse>, AppError> {
    let liked = state.sns.has_liked(post_id.id, &path.user_name).await?;
    Ok(Json(LikedResponse { liked }))
}
