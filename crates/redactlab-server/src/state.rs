//! Shared application state.

use std::sync::Arc;

use parking_lot::RwLock;
use redactlab_core::RedactLabConfig;
use redactlab_extract::{EntityExtractor, ExtractorConfig, LlmExtractor};
use redactlab_runtime::{Orchestrator, PipelineSettings};

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: RedactLabConfig,
    /// Provider keys and models. Shared with the LLM extractor so updates
    /// take effect on the next request.
    pub extractor_config: Arc<RwLock<ExtractorConfig>>,
    pub extractor: Arc<dyn EntityExtractor>,
    pub orchestrator: Orchestrator,
}

impl AppState {
    pub fn new(config: RedactLabConfig) -> Self {
        let extractor_config = Arc::new(RwLock::new(ExtractorConfig::load(
            &config.data_paths.extractor_config_file,
        )));
        let extractor: Arc<dyn EntityExtractor> =
            Arc::new(LlmExtractor::new(extractor_config.clone()));
        Self::with_extractor(config, extractor_config, extractor)
    }

    /// Build state around a specific extractor.
    pub fn with_extractor(
        config: RedactLabConfig,
        extractor_config: Arc<RwLock<ExtractorConfig>>,
        extractor: Arc<dyn EntityExtractor>,
    ) -> Self {
        let orchestrator = Orchestrator::new(PipelineSettings::from_config(&config));
        Self {
            config,
            extractor_config,
            extractor,
            orchestrator,
        }
    }
}
