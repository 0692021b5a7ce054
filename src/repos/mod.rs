/*
 * Responsibility
 * - 永続化層の公開 (row 型 / SQL / store 実装)
 */
pub mod comment_repo;
pub mod error;
pub mod like_repo;
pub mod memory_store;
pub mod pg_store;
pub mod post_repo;
pub mod store;

pub use memory_store::MemoryStore;
pub use pg_store::PgStore;
pub use store::SnsStore;
