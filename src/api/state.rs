use std::sync::Arc;

use crate::api::ApiError;
use crate::config::AppConfig;
use crate::models::AnalyzedMatch;
use crate::storage::{load_analyzed_matches, StorageConfig};

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<StorageConfig>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(storage: StorageConfig, config: AppConfig) -> Self {
        Self {
            storage: Arc::new(storage),
            config: Arc::new(config),
        }
    }

    /// Every stored match with insights attached, in file order.
    ///
    /// File reads and analysis run on the blocking pool.
    pub async fn analyzed_matches(&self) -> Result<Vec<AnalyzedMatch>, ApiError> {
        let storage = Arc::clone(&self.storage);
        tokio::task::spawn_blocking(move || load_analyzed_matches(&storage))
            .await
            .map_err(|e| ApiError::Internal(format!("Match loading task failed: {}", e)))?
            .map_err(ApiError::from)
    }
}
