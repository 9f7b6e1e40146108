use archgrade_core::ModelBreakdown;
use serde::Deserialize;

/// Structured verdict the model is asked to produce.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ModelReport {
    pub analysis: String,
    pub test_case_results: Vec<CaseResult>,
    pub detailed_results: ModelBreakdown,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, schemars::JsonSchema)]
pub(crate) struct CaseResult {
    pub name: String,
    pub passed: bool,
    pub description: String,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Reply {
    Parsed(ModelReport),
    Unparseable(String),
}

/// JSON schema of [`ModelReport`], embedded in the system prompt.
pub(crate) fn response_schema() -> String {
    serde_json::to_string_pretty(&schemars::schema_for!(ModelReport)).unwrap_or_default()
}

/// Parse raw model output. Anything that is not exactly the expected shape
/// is `Unparseable`; nothing is defaulted.
pub(crate) fn parse_model_output(raw: &str) -> Reply {
    let cleaned = strip_code_fences(raw);
    let Some(json_str) = extract_json_object(&cleaned) else {
        return Reply::Unparseable("no JSON object in response".to_string());
    };

    match serde_json::from_str::<ModelReport>(json_str) {
        Ok(report) => Reply::Parsed(report),
        Err(e) => Reply::Unparseable(e.to_string()),
    }
}

fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Extract the outermost JSON object substring, ignoring any prose around it.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}
