pub mod health;
pub mod ui;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::extraction::MAX_UPLOAD_BYTES;
use crate::session::handlers as session;
use crate::state::AppState;

/// Headroom over the file cap for multipart framing and the pasted-text field.
const BODY_LIMIT_BYTES: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ui::index_handler))
        .route("/health", get(health::health_handler))
        // Sessions & inputs
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(session::handle_get_session).delete(session::handle_delete_session),
        )
        .route("/api/v1/sessions/:id/cv", post(session::handle_upload_cv))
        .route("/api/v1/sessions/:id/jd", post(session::handle_upload_jd))
        // Analysis actions
        .route("/api/v1/sessions/:id/analyze", post(analysis::handle_analyze))
        .route("/api/v1/sessions/:id/fixed-cv", post(analysis::handle_fixed_cv))
        .route(
            "/api/v1/sessions/:id/ats-report",
            post(analysis::handle_ats_report),
        )
        .route(
            "/api/v1/sessions/:id/generate/:kind",
            post(analysis::handle_generate),
        )
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}
