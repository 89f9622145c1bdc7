use std::sync::Arc;

use openpaws_ai::AiService;

use crate::config::ServerConfig;
use crate::storage::ImageStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: openpaws_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Photo analysis and profile generation.
    pub ai: Arc<AiService>,
    /// Writes uploaded images under the public uploads directory.
    pub images: Arc<ImageStore>,
}
