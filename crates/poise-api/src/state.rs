//! Application state.

use std::sync::Arc;

use poise_analyzer::{AnalysisPipeline, AnalyzerConfig, ModelRegistry};
use poise_ml_client::MlClient;
use tracing::info;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub pipeline: Arc<AnalysisPipeline>,
    pub ml_client: Option<Arc<MlClient>>,
}

impl AppState {
    /// Create new application state.
    ///
    /// The model registry is built once here and shared by every request.
    pub async fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let analyzer_config = AnalyzerConfig::from_env();

        let ml_client = Arc::new(MlClient::from_env()?);
        info!("Using ML service at {}", ml_client.base_url());

        let registry = ModelRegistry::connect(&analyzer_config, Some(ml_client.clone())).await;
        info!("Model registry: {:?}", registry);

        let pipeline = AnalysisPipeline::new(analyzer_config, Arc::new(registry))?;

        Ok(Self::from_parts(config, pipeline, Some(ml_client)))
    }

    /// Assemble state from an already-built pipeline.
    pub fn from_parts(
        config: ApiConfig,
        pipeline: AnalysisPipeline,
        ml_client: Option<Arc<MlClient>>,
    ) -> Self {
        Self {
            config,
            pipeline: Arc::new(pipeline),
            ml_client,
        }
    }
}
