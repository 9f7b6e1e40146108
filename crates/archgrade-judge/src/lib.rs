pub mod engine;
mod parse;
mod prompt;
mod validator;

use std::sync::Arc;
use std::time::Duration;

use archgrade_core::{min_score, Breakdown, Design, JudgeSettings, Problem, TestResult, ValidationResult};

pub use engine::{LlmClient, ModelClient};
pub use validator::{rule_verdict, Validator};

#[derive(Debug, thiserror::Error)]
pub enum JudgeError {
    #[error("model judge is not configured")]
    NotConfigured,
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("build LLM: {0}")]
    Build(String),
    #[error("chat: {0}")]
    Invocation(String),
    #[error("LLM returned no text")]
    EmptyResponse,
    #[error("model did not answer within {0:?}")]
    Timeout(Duration),
    #[error("unparseable model output: {0}")]
    Unparseable(String),
}

/// Scores designs by asking an external model.
#[derive(Clone)]
pub struct Judge {
    client: Arc<dyn ModelClient>,
    timeout: Duration,
}

impl std::fmt::Debug for Judge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Judge").field("timeout", &self.timeout).finish_non_exhaustive()
    }
}

impl Judge {
    pub fn new(client: Arc<dyn ModelClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Build a judge backed by a hosted model. Fails when the settings lack a
    /// provider, model or key.
    pub fn from_settings(settings: &JudgeSettings) -> Result<Self, JudgeError> {
        if !settings.is_configured() {
            return Err(JudgeError::NotConfigured);
        }
        Ok(Self::new(
            Arc::new(LlmClient::new(settings.clone())),
            Duration::from_secs(settings.timeout_secs),
        ))
    }

    /// One bounded model call. Every failure, including a timeout or a reply
    /// of the wrong shape, comes back as a `JudgeError`.
    pub async fn judge(
        &self,
        design: &Design,
        problem: Option<&Problem>,
    ) -> Result<ValidationResult, JudgeError> {
        let system = prompt::system_prompt();
        let user_msg = prompt::user_message(design, problem);

        tracing::debug!(timeout = ?self.timeout, "sending design to model judge");

        let raw = tokio::time::timeout(self.timeout, self.client.complete(&system, &user_msg))
            .await
            .map_err(|_| JudgeError::Timeout(self.timeout))??;

        tracing::debug!(raw = %raw, "raw model output");

        match parse::parse_model_output(&raw) {
            parse::Reply::Parsed(report) => Ok(into_result(report, problem)),
            parse::Reply::Unparseable(reason) => Err(JudgeError::Unparseable(reason)),
        }
    }
}

fn into_result(report: parse::ModelReport, problem: Option<&Problem>) -> ValidationResult {
    ValidationResult {
        score: report.score,
        passed: report.score >= min_score(problem),
        feedback: report.analysis,
        breakdown: Breakdown::Model(report.detailed_results),
        // Model-judged cases carry no point value.
        test_results: report
            .test_case_results
            .into_iter()
            .map(|case| TestResult {
                name: case.name,
                passed: case.passed,
                points: 0,
                description: case.description,
            })
            .collect(),
    }
}
