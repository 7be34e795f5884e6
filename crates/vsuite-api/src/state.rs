//! Application state.

use std::sync::Arc;

use vsuite_pipeline::{FramePipeline, ImagePanels, PipelineConfig};
use vsuite_vision_client::{VisionBackend, VisionClient, VisionClientConfig, VisionResult};

use crate::config::ApiConfig;
use crate::session::SessionStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub vision: VisionClientConfig,
    pub panels: ImagePanels,
    pub pipeline: FramePipeline,
    pub sessions: SessionStore,
}

impl AppState {
    /// Create state backed by the HTTP vision client.
    pub fn new(
        config: ApiConfig,
        vision: VisionClientConfig,
        pipeline: PipelineConfig,
    ) -> VisionResult<Self> {
        let client = VisionClient::new(vision.clone())?;
        Ok(Self::with_backend(config, vision, pipeline, Arc::new(client)))
    }

    /// Create state around any vision backend.
    pub fn with_backend(
        config: ApiConfig,
        vision: VisionClientConfig,
        pipeline: PipelineConfig,
        backend: Arc<dyn VisionBackend>,
    ) -> Self {
        Self {
            config,
            vision,
            panels: ImagePanels::new(Arc::clone(&backend), pipeline.clone()),
            pipeline: FramePipeline::new(backend, pipeline),
            sessions: SessionStore::new(),
        }
    }
}
