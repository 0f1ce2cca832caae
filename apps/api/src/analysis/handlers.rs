//! Axum route handlers for the analysis actions.
//!
//! Each handler copies the session inputs out of the store, runs its pipeline
//! without holding any lock, and writes back only on success. A failed model
//! call therefore leaves every previously stored value untouched.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::generators::generate;
use crate::analysis::pipeline::{
    rewrite_cv, run_analysis, run_ats_report, AnalysisReport, AtsReport,
};
use crate::analysis::prompts::Task;
use crate::errors::AppError;
use crate::session::handlers::{load_session, store};
use crate::session::SessionContext;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Standalone generators exposed at `/generate/:kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerateKind {
    Suggestions,
    CoverLetter,
    InterviewQuestions,
}

impl GenerateKind {
    fn task(self) -> Task {
        match self {
            GenerateKind::Suggestions => Task::Suggest,
            GenerateKind::CoverLetter => Task::CoverLetter,
            GenerateKind::InterviewQuestions => Task::Interview,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub kind: GenerateKind,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct FixedCvResponse {
    pub fixed_cv: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions/:id/analyze
///
/// Analyze & Optimize: score → optional rewrite + re-score → suggestions,
/// cover letter, interview questions.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisReport>, AppError> {
    let session = load_session(&state, id)?;
    let (cv_text, jd_text) = require_inputs(&session)?;

    let report = run_analysis(state.llm.as_ref(), &state.policy, cv_text, jd_text).await?;
    info!(
        "Session {id}: ATS {} → {} (rewritten: {})",
        report.outcome.original_score, report.outcome.optimized_score, report.outcome.rewritten
    );

    Ok(Json(report))
}

/// POST /api/v1/sessions/:id/fixed-cv
///
/// Rewrites the CV for the JD and keeps the result in the session for the
/// ATS report. If either input is replaced while the rewrite runs, the result
/// is discarded and 409 returned.
pub async fn handle_fixed_cv(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FixedCvResponse>, AppError> {
    let session = load_session(&state, id)?;
    let (cv_text, jd_text) = require_inputs(&session)?;

    let fixed_cv = rewrite_cv(state.llm.as_ref(), cv_text, jd_text).await?;

    let stored = fixed_cv.clone();
    let current = store(&state, id, move |ctx| ctx.set_fixed_cv(cv_text, jd_text, stored))?;
    if !current {
        warn!("Session {id}: inputs replaced during rewrite, discarding result");
        return Err(AppError::Conflict(
            "The CV or job description changed while the optimized CV was being generated. \
             Please generate it again."
                .to_string(),
        ));
    }

    Ok(Json(FixedCvResponse { fixed_cv }))
}

/// POST /api/v1/sessions/:id/ats-report
///
/// Scores the original and the fixed CV and returns a keyword report.
/// Requires a fixed CV from `/fixed-cv` first.
pub async fn handle_ats_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AtsReport>, AppError> {
    let session = load_session(&state, id)?;
    let (cv_text, jd_text) = require_inputs(&session)?;
    let fixed_cv = session.fixed_cv.as_deref().ok_or_else(|| {
        AppError::Validation("Generate the optimized CV before requesting the ATS report".to_string())
    })?;

    let report = run_ats_report(
        state.llm.as_ref(),
        &state.policy,
        cv_text,
        jd_text,
        fixed_cv,
    )
    .await?;

    Ok(Json(report))
}

/// POST /api/v1/sessions/:id/generate/:kind
pub async fn handle_generate(
    State(state): State<AppState>,
    Path((id, kind)): Path<(Uuid, GenerateKind)>,
) -> Result<Json<GenerateResponse>, AppError> {
    let session = load_session(&state, id)?;
    let (cv_text, jd_text) = require_inputs(&session)?;

    let text = generate(state.llm.as_ref(), kind.task(), cv_text, jd_text).await?;

    Ok(Json(GenerateResponse { kind, text }))
}

/// Both inputs must have been submitted. An empty CV (failed extraction) is
/// accepted and simply scores low.
fn require_inputs(session: &SessionContext) -> Result<(&str, &str), AppError> {
    match (session.cv_text.as_deref(), session.jd_text.as_deref()) {
        (Some(cv), Some(jd)) => Ok((cv, jd)),
        _ => Err(AppError::Validation(
            "Please upload CV and Job Description first.".to_string(),
        )),
    }
}
