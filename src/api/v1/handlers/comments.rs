/*
 * Responsibility
 * - /posts/{post_id}/comments 系 handler
 * - comment は常に post 配下でスコープされる (別 post の comment は 404)
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::comments::{CommentResponse, CreateCommentRequest, UpdateCommentRequest},
        extractors::{json_body::JsonBody, path_id::{CommentId, PostId}},
    },
    error::AppError,
    state::AppState,
};

pub async fn list_comments(
    State(state): State<AppState>,
    post_id: PostId,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let rows = state.sns.list_comments(post_id.id).await?;
    Ok(Json(rows.into_iter().map(CommentResponse::from).collect()))
}

pub async fn create_comment(
    State(state): State<AppState>,
    post_id: PostId,
    JsonBody(req): JsonBody<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    let row = state
        .sns
        .create_comment(post_id.id, &req.user_name, &req.content)
        .await?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_comment(
    State(state): State<AppState>,
    post_id: PostId,
    comment_id: CommentId,
) -> Result<Json<CommentResponse>, AppError> {
    let row = state.sns.get_comment(post_id.id, comment_id.id).await?;
    Ok(Json(row.into()))
}

pub async fn update_comment(
    State(state): State<AppState>,
    post_id: PostId,
    comment_id: CommentId,
    JsonBody(req): JsonBody<UpdateCommentRequest>,
) -> Result<Json<CommentResponse>, AppError> {
    let row = state
        .sns
        .update_comment(post_id.id, comment_id.id, &req.content)
        .await?;
    Ok(Json(row.into()))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    post_id: PostId,
    comment_id: CommentId,
) -> Result<StatusCode, AppError> {
    state.sns.delete_comment(post_id.id, comment_id.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
