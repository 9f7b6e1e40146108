use archgrade_core::{catalog, feedback, min_score, rules, Breakdown, Design, JudgeSettings, Problem, ValidationResult};

use crate::Judge;

/// Chooses between the model judge and the rule engine for each design.
///
/// With a judge configured, its verdict is returned as-is. Without one, or
/// when the judge fails for any reason, the rule engine scores the design.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    judge: Option<Judge>,
}

impl Validator {
    pub fn rules_only() -> Self {
        Self { judge: None }
    }

    pub fn with_judge(judge: Judge) -> Self {
        Self { judge: Some(judge) }
    }

    /// Enable the model path only when the settings are complete.
    pub fn from_settings(settings: &JudgeSettings) -> Self {
        match Judge::from_settings(settings) {
            Ok(judge) => {
                tracing::info!(
                    provider = %settings.provider,
                    model = %settings.model,
                    timeout_secs = settings.timeout_secs,
                    "model judge enabled"
                );
                Self::with_judge(judge)
            }
            Err(e) => {
                tracing::info!(reason = %e, "model judge disabled, using rule engine only");
                Self::rules_only()
            }
        }
    }

    pub fn judge_enabled(&self) -> bool {
        self.judge.is_some()
    }

    pub async fn validate(&self, design: &Design) -> ValidationResult {
        let problem = design.problem_id.as_deref().and_then(catalog::problem);
        if design.problem_id.is_some() && problem.is_none() {
            tracing::debug!(problem_id = ?design.problem_id, "unknown problem, scoring generically");
        }

        if let Some(judge) = &self.judge {
            match judge.judge(design, problem).await {
                Ok(result) => {
                    tracing::info!(score = result.score, passed = result.passed, "model judge verdict");
                    return result;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "model judge failed, falling back to rule engine");
                }
            }
        }

        rule_verdict(design, problem)
    }
}

/// Score a design with the rule engine alone.
pub fn rule_verdict(design: &Design, problem: Option<&Problem>) -> ValidationResult {
    let outcome = rules::score_rules(design, problem);
    let score = outcome.score();
    let result = ValidationResult {
        score,
        passed: score >= min_score(problem),
        feedback: feedback::feedback(score).to_string(),
        breakdown: Breakdown::Rules(outcome.breakdown),
        test_results: outcome.tests,
    };
    tracing::info!(score = result.score, passed = result.passed, "rule engine verdict");
    result
}
