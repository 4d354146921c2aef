use std::sync::Arc;

use crate::llm_client::TextGenerator;
use crate::render::Renderer;
use crate::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: ResumeStore,
    /// Production: `LlmClient`. Tests swap in scripted generators.
    pub llm: Arc<dyn TextGenerator>,
    /// Receives validated selections only.
    pub renderer: Arc<dyn Renderer>,
}
