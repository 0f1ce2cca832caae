//! Analysis pipelines, one per user action.
//!
//! Analyze & Optimize:
//!   score(cv) → decide → [rewrite → score(rewrite)] → suggestions → cover letter → questions
//!
//! Every call is awaited before the next starts. Any completion failure aborts
//! the whole action; nothing partial is returned.

use serde::Serialize;
use tracing::info;

use crate::analysis::generators::{generate, score};
use crate::analysis::optimization::{
    ChangeFormula, Decision, OptimizationOutcome, OptimizationPolicy,
};
use crate::analysis::prompts::Task;
use crate::llm_client::{CompletionClient, LlmError};

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub outcome: OptimizationOutcome,
    pub suggestions: String,
    pub cover_letter: String,
    pub interview_questions: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AtsReport {
    pub original_score: f64,
    pub optimized_score: f64,
    pub change: f64,
    pub change_formula: ChangeFormula,
    pub keyword_report: String,
}

/// Runs the full Analyze & Optimize chain: 4 completion calls when the CV
/// already clears the policy threshold, 6 otherwise.
pub async fn run_analysis(
    client: &dyn CompletionClient,
    policy: &OptimizationPolicy,
    cv_text: &str,
    jd_text: &str,
) -> Result<AnalysisReport, LlmError> {
    let outcome = optimize(client, policy, cv_text, jd_text).await?;

    let suggestions = generate(client, Task::Suggest, cv_text, jd_text).await?;
    let cover_letter = generate(client, Task::CoverLetter, cv_text, jd_text).await?;
    let interview_questions = generate(client, Task::Interview, cv_text, jd_text).await?;

    Ok(AnalysisReport {
        outcome,
        suggestions,
        cover_letter,
        interview_questions,
    })
}

/// Scores the CV and, below the threshold, rewrites and re-scores it.
pub async fn optimize(
    client: &dyn CompletionClient,
    policy: &OptimizationPolicy,
    cv_text: &str,
    jd_text: &str,
) -> Result<OptimizationOutcome, LlmError> {
    let original = score(client, cv_text, jd_text).await?;

    match policy.decide(original.value) {
        Decision::Keep => {
            info!(
                "Original ATS {} ≥ {}, skipping rewrite",
                original.value, policy.rewrite_threshold
            );
            Ok(OptimizationOutcome::kept(policy, original.value, cv_text))
        }
        Decision::Rewrite => {
            let rewritten_cv = rewrite_cv(client, cv_text, jd_text).await?;
            let optimized = score(client, &rewritten_cv, jd_text).await?;
            info!("ATS {} → {} after rewrite", original.value, optimized.value);
            Ok(OptimizationOutcome::rewritten(
                policy,
                original.value,
                optimized.value,
                rewritten_cv,
            ))
        }
    }
}

/// One rewrite call, no scoring. Backs the Optimized CV page.
pub async fn rewrite_cv(
    client: &dyn CompletionClient,
    cv_text: &str,
    jd_text: &str,
) -> Result<String, LlmError> {
    generate(client, Task::Rewrite, cv_text, jd_text).await
}

/// Scores the original and the fixed CV, then asks for the keyword report.
/// Backs the ATS Report page.
pub async fn run_ats_report(
    client: &dyn CompletionClient,
    policy: &OptimizationPolicy,
    cv_text: &str,
    jd_text: &str,
    fixed_cv: &str,
) -> Result<AtsReport, LlmError> {
    let original = score(client, cv_text, jd_text).await?;
    let optimized = score(client, fixed_cv, jd_text).await?;
    let keyword_report = generate(client, Task::KeywordReport, cv_text, jd_text).await?;

    Ok(AtsReport {
        original_score: original.value,
        optimized_score: optimized.value,
        change: policy.change(original.value, optimized.value),
        change_formula: policy.change_formula,
        keyword_report,
    })
}
