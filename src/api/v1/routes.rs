/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health, /posts, /posts/{post_id}/comments, /posts/{post_id}/likes
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use crate::api::v1::handlers::{
    comments::{create_comment, delete_comment, get_comment, list_comments, update_comment},
    health::health,
    likes::{has_liked, like_post, list_likes, unlike_post},
    posts::{create_post, delete_post, get_post, list_posts, recount_post, update_post},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/{post_id}",
            get(get_post).patch(update_post).delete(delete_post),
        )
        .route("/posts/{post_id}/recount", post(recount_post))
        .route(
            "/posts/{post_id}/comments",
            get(list_comments).post(create_comment),
        )
        .route(
            "/posts/{post_id}/comments/{comment_id}",
            get(get_comment).patch(update_comment).delete(delete_comment),
        )
        .route(
            "/posts/{post_id}/likes",
            get(list_likes).post(like_post).delete(unlike_post),
        )
        .route("/posts/{post_id}/likes/{user_name}", get(has_liked))
}
