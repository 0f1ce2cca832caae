//! Optimization decision: whether a CV gets rewritten, and how score
//! change is reported.

use serde::{Deserialize, Serialize};

/// Scores at or above this skip the rewrite.
pub const DEFAULT_REWRITE_THRESHOLD: f64 = 90.0;

/// How the change between original and optimized score is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeFormula {
    /// `optimized - original`, in score points.
    #[default]
    Difference,
    /// `(optimized - original) / optimized * 100`, rounded to 2 decimals.
    /// 0.0 when `optimized` is 0.
    Ratio,
}

impl ChangeFormula {
    pub fn apply(self, original: f64, optimized: f64) -> f64 {
        match self {
            ChangeFormula::Difference => optimized - original,
            ChangeFormula::Ratio => {
                if optimized == 0.0 {
                    return 0.0;
                }
                (((optimized - original) / optimized) * 100.0 * 100.0).round() / 100.0
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Keep,
    Rewrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptimizationPolicy {
    pub rewrite_threshold: f64,
    pub change_formula: ChangeFormula,
}

impl Default for OptimizationPolicy {
    fn default() -> Self {
        Self {
            rewrite_threshold: DEFAULT_REWRITE_THRESHOLD,
            change_formula: ChangeFormula::default(),
        }
    }
}

impl OptimizationPolicy {
    pub fn decide(&self, original_score: f64) -> Decision {
        if original_score >= self.rewrite_threshold {
            Decision::Keep
        } else {
            Decision::Rewrite
        }
    }

    pub fn change(&self, original: f64, optimized: f64) -> f64 {
        self.change_formula.apply(original, optimized)
    }

    /// Message shown in place of a rewrite when the CV already clears the threshold.
    pub fn keep_note(&self) -> String {
        format!(
            "Your CV already scores high ({}+). No major changes needed.",
            self.rewrite_threshold
        )
    }
}

/// Result of the optimize step of the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationOutcome {
    pub original_score: f64,
    /// Equal to `original_score` when no rewrite was attempted.
    pub optimized_score: f64,
    /// The rewritten CV, or the original text echoed back when kept.
    pub rewritten_cv: String,
    pub rewritten: bool,
    pub note: Option<String>,
    pub change: f64,
    pub change_formula: ChangeFormula,
}

impl OptimizationOutcome {
    pub fn kept(policy: &OptimizationPolicy, original_score: f64, cv_text: &str) -> Self {
        Self {
            original_score,
            optimized_score: original_score,
            rewritten_cv: cv_text.to_string(),
            rewritten: false,
            note: Some(policy.keep_note()),
            change: policy.change(original_score, original_score),
            change_formula: policy.change_formula,
        }
    }

    pub fn rewritten(
        policy: &OptimizationPolicy,
        original_score: f64,
        optimized_score: f64,
        rewritten_cv: String,
    ) -> Self {
        Self {
            original_score,
            optimized_score,
            rewritten_cv,
            rewritten: true,
            note: None,
            change: policy.change(original_score, optimized_score),
            change_formula: policy.change_formula,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difference_formula() {
        assert_eq!(ChangeFormula::Difference.apply(70.0, 90.0), 20.0);
        assert_eq!(ChangeFormula::Difference.apply(80.0, 75.0), -5.0);
    }

    #[test]
    fn test_ratio_formula() {
        assert_eq!(ChangeFormula::Ratio.apply(70.0, 90.0), 22.22);
    }

    #[test]
    fn test_ratio_formula_guards_zero_optimized() {
        let change = ChangeFormula::Ratio.apply(70.0, 0.0);
        assert_eq!(change, 0.0);
        assert!(change.is_finite());
    }

    #[test]
    fn test_default_policy_is_threshold_90_difference() {
        let policy = OptimizationPolicy::default();
        assert_eq!(policy.rewrite_threshold, 90.0);
        assert_eq!(policy.change_formula, ChangeFormula::Difference);
        assert_eq!(policy.change(70.0, 90.0), 20.0);
    }

    #[test]
    fn test_decide_at_and_around_threshold() {
        let policy = OptimizationPolicy::default();
        assert_eq!(policy.decide(90.0), Decision::Keep);
        assert_eq!(policy.decide(97.0), Decision::Keep);
        assert_eq!(policy.decide(89.9), Decision::Rewrite);
        assert_eq!(policy.decide(85.0), Decision::Rewrite);
        assert_eq!(policy.decide(0.0), Decision::Rewrite);
    }

    #[test]
    fn test_kept_outcome_echoes_cv() {
        let policy = OptimizationPolicy::default();
        let outcome = OptimizationOutcome::kept(&policy, 93.0, "Rust engineer, 8 years");
        assert_eq!(outcome.optimized_score, 93.0);
        assert_eq!(outcome.rewritten_cv, "Rust engineer, 8 years");
        assert!(!outcome.rewritten);
        assert_eq!(outcome.change, 0.0);
        assert!(outcome.note.unwrap().contains("90+"));
    }

    #[test]
    fn test_kept_outcome_under_ratio_does_not_divide_by_zero() {
        let policy = OptimizationPolicy {
            rewrite_threshold: 0.0,
            change_formula: ChangeFormula::Ratio,
        };
        let outcome = OptimizationOutcome::kept(&policy, 0.0, "");
        assert_eq!(outcome.change, 0.0);
    }

    #[test]
    fn test_rewritten_outcome_reports_change() {
        let policy = OptimizationPolicy::default();
        let outcome = OptimizationOutcome::rewritten(&policy, 62.0, 81.0, "new cv".to_string());
        assert!(outcome.rewritten);
        assert_eq!(outcome.change, 19.0);
        assert!(outcome.note.is_none());
    }
}
