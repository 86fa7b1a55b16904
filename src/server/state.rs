//! Application state management

use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

use crate::error::{CostError, Result};
use crate::inference::Predictor;

use super::ServerConfig;

/// Application state shared across handlers
pub struct AppState {
    pub config: ServerConfig,
    pub started_at: chrono::DateTime<chrono::Utc>,
    predictor: OnceCell<Arc<Predictor>>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            started_at: chrono::Utc::now(),
            predictor: OnceCell::new(),
        }
    }

    /// State with an already loaded predictor
    pub fn with_predictor(config: ServerConfig, predictor: Predictor) -> Self {
        let predictor = predictor.with_config(config.predictor.clone());
        Self {
            config,
            started_at: chrono::Utc::now(),
            predictor: OnceCell::new_with(Some(Arc::new(predictor))),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.predictor.initialized()
    }

    /// Shared predictor, loading the artifact on first call.
    ///
    /// A failed load leaves the cell empty so a later request can pick up an
    /// artifact trained in the meantime.
    pub async fn predictor(&self) -> Result<Arc<Predictor>> {
        let predictor = self
            .predictor
            .get_or_try_init(|| async {
                let path = self.config.model_path.clone();
                let config = self.config.predictor.clone();
                let predictor = tokio::task::spawn_blocking(move || Predictor::load(&path))
                    .await
                    .map_err(|e| CostError::ComputationError(format!("artifact load task failed: {}", e)))??
                    .with_config(config);
                info!(model_path = %self.config.model_path.display(), "Predictor ready");
                Ok::<_, CostError>(Arc::new(predictor))
            })
            .await?;
        Ok(Arc::clone(predictor))
    }
}
