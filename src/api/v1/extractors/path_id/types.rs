/**
 * Responsibility
 *  - リソースごとの「意味付きID型」を宣言する
 *  - route のパラメータ名とリソース名をここで結びつける
 *
 * 以下に pub で列挙するものは、./mod.rs 経由で全て公開されるため注意
 */
use super::core::{PathId, PathParam};

// posts
pub enum PostTag {}
impl PathParam for PostTag {
    const NAME: &'static str = "post_id";
    const RESOURCE: &'static str = "post";
}
pub type PostId = PathId<PostTag>;

// comments
pub enum CommentTag {}
impl PathParam for CommentTag {
    const NAME: &'static str = "comment_id";
    const RESOURCE: &'static str = "comment";
}
pub type CommentId = PathId<CommentTag>;
