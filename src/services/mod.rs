/*
 * Responsibility
 * - ドメインロジック (store に依存しない部分) の公開
 */
pub mod counters;
pub mod sns;

#[cfg(test)]
pub(crate) mod store_checks;

pub use sns::{Resource, SnsError, SnsService};
