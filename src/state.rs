/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - sns: SnsService (内部に store handle を持つ)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::repos::SnsStore;
use crate::services::SnsService;

#[derive(Clone, Debug)]
pub struct AppState {
    pub sns: SnsService,
}

impl AppState {
    pub fn new(store: Arc<dyn SnsStore>) -> Self {
        Self {
            sns: SnsService::new(store),
        }
    }
}
