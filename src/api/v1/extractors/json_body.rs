/*
 * Responsibility
 *  - axum::Json のラッパー。rejection を AppError (JSON error body) に揃える
 *  - Content-Type 不一致 / 壊れた JSON / 型不一致 はすべて 400 INVALID_JSON
 */
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(status = %rejection.status(), "json body rejected");
        AppError::bad_request("INVALID_JSON", rejection.body_text())
    }
}

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
