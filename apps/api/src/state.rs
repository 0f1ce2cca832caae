use std::sync::Arc;

use crate::analysis::optimization::OptimizationPolicy;
use crate::llm_client::CompletionClient;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable completion backend. Default: OpenAiClient.
    pub llm: Arc<dyn CompletionClient>,
    pub sessions: Arc<SessionStore>,
    /// The one rewrite/score-change policy every action uses.
    pub policy: OptimizationPolicy,
}
