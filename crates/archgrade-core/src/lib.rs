pub mod catalog;
pub mod feedback;
pub mod rules;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use catalog::{ComponentType, Problem, TestCase};

/// Passing threshold used when a design is not tied to a catalog problem.
pub const DEFAULT_MIN_SCORE: u32 = 70;

// --- Design (request-scoped) ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Component {
    pub id: String,
    /// Component type id, e.g. "web-server". May be unknown to the catalog.
    #[serde(rename = "type")]
    pub kind: String,
    pub position: Position,
}

/// A directed edge between two components. Either endpoint may be missing or
/// point at an id that is not part of the design.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Connection {
    #[serde(default, alias = "from")]
    pub from_component: Option<String>,
    #[serde(default, alias = "to")]
    pub to_component: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Design {
    pub components: Vec<Component>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub problem_id: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("component at index {index} has an empty id")]
    EmptyComponentId { index: usize },
    #[error("component '{id}' has an empty type")]
    EmptyComponentType { id: String },
}

impl Design {
    /// Trim identifiers and drop blank optional fields.
    ///
    /// Duplicate component ids are kept as submitted; lookups keyed by id see
    /// the last occurrence.
    pub fn normalized(mut self) -> Result<Self, IntakeError> {
        for (index, component) in self.components.iter_mut().enumerate() {
            let id = component.id.trim();
            if id.is_empty() {
                return Err(IntakeError::EmptyComponentId { index });
            }
            component.id = id.to_string();

            let kind = component.kind.trim();
            if kind.is_empty() {
                return Err(IntakeError::EmptyComponentType {
                    id: component.id.clone(),
                });
            }
            component.kind = kind.to_string();
        }

        for connection in &mut self.connections {
            connection.from_component = non_blank(connection.from_component.take());
            connection.to_component = non_blank(connection.to_component.take());
        }

        self.problem_id = non_blank(self.problem_id.take());
        Ok(self)
    }

    /// Component type ids in submission order, duplicates included.
    pub fn component_types(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|c| c.kind.as_str())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// --- Verdicts ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub points: u32,
    pub description: String,
}

impl TestResult {
    pub fn pass(name: impl Into<String>, points: u32, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            points,
            description: description.into(),
        }
    }

    pub fn fail(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            points: 0,
            description: description.into(),
        }
    }
}

/// Sub-scores from the rule engine, each capped at 25.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RuleBreakdown {
    pub required_components: u32,
    pub connections: u32,
    pub architecture_patterns: u32,
    pub best_practices: u32,
}

impl RuleBreakdown {
    pub fn total(&self) -> u32 {
        self.required_components + self.connections + self.architecture_patterns + self.best_practices
    }
}

/// Quality dimensions scored 0-100 by the model judge.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, schemars::JsonSchema,
)]
pub struct ModelBreakdown {
    pub scalability: u32,
    pub reliability: u32,
    pub completeness: u32,
    pub correctness: u32,
}

/// Which scoring path produced a result. Both serialize to the flat
/// `detailed_results` object on the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Breakdown {
    Rules(RuleBreakdown),
    Model(ModelBreakdown),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationResult {
    pub score: u32,
    pub passed: bool,
    pub feedback: String,
    #[serde(rename = "detailed_results")]
    pub breakdown: Breakdown,
    pub test_results: Vec<TestResult>,
}

/// Passing threshold for an optional problem.
pub fn min_score(problem: Option<&Problem>) -> u32 {
    problem.map_or(DEFAULT_MIN_SCORE, |p| p.min_score)
}

// --- Judge settings ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct JudgeSettings {
    pub provider: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for JudgeSettings {
    fn default() -> Self {
        Self {
            provider: "google".to_string(),
            api_key: String::new(),
            model: "gemini-1.5-flash".to_string(),
            timeout_secs: 30,
        }
    }
}

impl JudgeSettings {
    /// The model path is only attempted with a provider, a model and a key.
    pub fn is_configured(&self) -> bool {
        !self.provider.trim().is_empty()
            && !self.model.trim().is_empty()
            && !self.api_key.trim().is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Resolve the global config directory (~/.archgrade/).
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".archgrade")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn read_settings_from(path: &Path) -> Result<JudgeSettings, SettingsError> {
    let raw = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| SettingsError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Read `~/.archgrade/settings.json`, falling back to defaults when the file
/// is missing or unreadable.
pub fn read_settings() -> JudgeSettings {
    let path = settings_path();
    if !path.exists() {
        return JudgeSettings::default();
    }
    read_settings_from(&path).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring settings file");
        JudgeSettings::default()
    })
}
