/*
 * Responsibility
 *  - Path パラメータ (String) を内部 ID (i64) に変換する extractor
 *  - 整数でなければ AppError::bad_request へ変換 (存在チェックは service の責務)
 *  - posts / comments で共通利用
 *
 * 置くもの
 *  - PathId<T> の定義（ジェネリック本体）と FromRequestParts 実装
 * 置かないもの
 *  - Post / Comment といった具体リソース名 (types.rs へ)
 *
 * Nested routes carry several ids (`/posts/{post_id}/comments/{comment_id}`), so
 * each tag names the parameter it reads instead of taking the whole path.
 */
use std::collections::HashMap;
use std::marker::PhantomData;

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::AppError;

/// Binds a tag type to the route parameter it is read from.
pub trait PathParam {
    const NAME: &'static str;
    const RESOURCE: &'static str;
}

pub struct PathId<T> {
    pub id: i64,
    _marker: PhantomData<T>,
}

impl<T> PathId<T> {
    fn new(id: i64) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }
}

// Any integer is well-formed; `0` or `-1` simply match nothing and end up as 404.
fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok()
}

impl<S, T> FromRequestParts<S> for PathId<T>
where
    S: Send + Sync,
    T: PathParam + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::bad_request("INVALID_PATH", "invalid path parameters"))?;

        let Some(raw) = params.get(T::NAME) else {
            // route declared without the parameter: programming error
            tracing::error!(param = T::NAME, "path parameter missing from route");
            return Err(AppError::Internal);
        };

        let id = parse_id(raw).ok_or_else(|| {
            AppError::bad_request("INVALID_ID", format!("invalid {} id", T::RESOURCE))
        })?;
        Ok(Self::new(id))
    }
}

impl<T> std::fmt::Debug for PathId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathId").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::parse_id;

    #[test]
    fn accepts_any_integer() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("0"), Some(0));
        assert_eq!(parse_id("-3"), Some(-3));
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("4.2"), None);
        assert_eq!(parse_id("99999999999999999999"), None);
    }
}
