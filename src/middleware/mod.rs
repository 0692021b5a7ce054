/*
 * Responsibility
 * - middleware の公開インターフェース
 * - app.rs からは apply(...) を順に呼ぶだけ
 */
pub mod cors;
pub mod http;
