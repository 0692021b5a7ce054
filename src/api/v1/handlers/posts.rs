/*
 * Responsibility
 * - /posts 系 handler
 * - Path の {post_id} は extractor で内部 ID に変換して受け取る
 * - 検証・カウンタ・cascade は SnsService の責務 (handler は変換だけ)
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::posts::{CreatePostRequest, PostResponse, UpdatePostRequest},
        extractors::{json_body::JsonBody, path_id::PostId},
    },
    error::AppError,
    state::AppState,
};

pub async fn list_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let rows = state.sns.list_posts().await?;
    Ok(Json(rows.into_iter().map(PostResponse::from).collect()))
}

pub async fn create_post(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    let row = state.sns.create_post(&req.user_name, &req.content).await?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_post(
    State(state): State<AppState>,
    post_id: PostId,
) -> Result<Json<PostResponse>, AppError> {
    let row = state.sns.get_post(post_id.id).await?;
    Ok(Json(row.into()))
}

pub async fn update_post(
    State(state): State<AppState>,
    post_id: PostId,
    JsonBody(req): JsonBody<UpdatePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    let row = state.sns.update_post(post_id.id, &req.content).await?;
    Ok(Json(row.into()))
}

pub async fn delete_post(
    State(state): State<AppState>,
    post_id: PostId,
) -> Result<StatusCode, AppError> {
    state.sns.delete_post(post_id.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn recount_post(
    State(state): State<AppState>,
    post_id: PostId,
) -> Result<Json<PostResponse>, AppError> {
    let row = state.sns.reconcile_counts(post_id.id).await?;
    Ok(Json(row.into()))
}
