//! Deterministic scoring rules.
//!
//! Four independent checks run over a design. Each produces a sub-score capped
//! at [`SUB_SCORE_CAP`] and the test records that explain it.

use std::collections::{HashMap, HashSet};

use crate::catalog::{self, Problem};
use crate::{Design, RuleBreakdown, TestResult};

pub const SUB_SCORE_CAP: u32 = 25;

const REQUIRED_COMPONENT_POINTS: u32 = 5;
const BASIC_COMPONENT_POINTS: u32 = 10;
const BASIC_COMPONENTS: [&str; 2] = ["web-server", "database"];
const DIVERSITY_THRESHOLD: usize = 4;
const DIVERSITY_POINTS: u32 = 5;

const CONNECTED_POINTS: u32 = 10;
const LEGAL_CONNECTION_POINTS: u32 = 3;

/// Result of running every rule check over a design.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub breakdown: RuleBreakdown,
    pub tests: Vec<TestResult>,
}

impl RuleOutcome {
    pub fn score(&self) -> u32 {
        self.breakdown.total()
    }
}

pub fn score_rules(design: &Design, problem: Option<&Problem>) -> RuleOutcome {
    let types: HashSet<&str> = design.component_types().collect();
    let mut tests = Vec::new();

    let (required_components, mut t) = check_required_components(design, &types, problem);
    tests.append(&mut t);
    let (connections, mut t) = check_connections(design);
    tests.append(&mut t);
    let (architecture_patterns, mut t) = check_architecture_patterns(&types);
    tests.append(&mut t);
    let (best_practices, mut t) = check_best_practices(&types);
    tests.append(&mut t);

    RuleOutcome {
        breakdown: RuleBreakdown {
            required_components,
            connections,
            architecture_patterns,
            best_practices,
        },
        tests,
    }
}

fn check_required_components(
    design: &Design,
    types: &HashSet<&str>,
    problem: Option<&Problem>,
) -> (u32, Vec<TestResult>) {
    let mut score = 0;
    let mut tests = Vec::new();

    match problem {
        Some(problem) => {
            for required in problem.required_components {
                let name = catalog::display_name(required);
                let test_name = format!("Required component: {name}");
                if types.contains(required) {
                    score += REQUIRED_COMPONENT_POINTS;
                    tests.push(TestResult::pass(
                        test_name,
                        REQUIRED_COMPONENT_POINTS,
                        format!("{name} is present"),
                    ));
                } else {
                    tests.push(TestResult::fail(test_name, format!("Missing required {name}")));
                }
            }
        }
        None => {
            for basic in BASIC_COMPONENTS {
                if types.contains(basic) {
                    let name = catalog::display_name(basic);
                    score += BASIC_COMPONENT_POINTS;
                    tests.push(TestResult::pass(
                        format!("Basic component: {name}"),
                        BASIC_COMPONENT_POINTS,
                        format!("{name} is present"),
                    ));
                }
            }

            let count = design.components.len();
            if count >= DIVERSITY_THRESHOLD {
                score += DIVERSITY_POINTS;
                tests.push(TestResult::pass(
                    "Component diversity",
                    DIVERSITY_POINTS,
                    format!("Good component diversity ({count} components)"),
                ));
            }
        }
    }

    (score.min(SUB_SCORE_CAP), tests)
}

fn check_connections(design: &Design) -> (u32, Vec<TestResult>) {
    let mut score = 0;
    let mut tests = Vec::new();

    let count = design.connections.len();
    if count > 0 {
        score += CONNECTED_POINTS;
        tests.push(TestResult::pass(
            "Component connections",
            CONNECTED_POINTS,
            format!("{count} connections found"),
        ));
    } else {
        tests.push(TestResult::fail(
            "Component connections",
            "No connections between components",
        ));
    }

    // Later components overwrite earlier ones that share an id.
    let type_of: HashMap<&str, &str> = design
        .components
        .iter()
        .map(|c| (c.id.as_str(), c.kind.as_str()))
        .collect();

    for connection in &design.connections {
        let endpoints = connection
            .from_component
            .as_deref()
            .and_then(|id| type_of.get(id))
            .zip(connection.to_component.as_deref().and_then(|id| type_of.get(id)));
        let Some((from, to)) = endpoints else {
            continue;
        };
        let Some(source) = catalog::component_type(from) else {
            continue;
        };
        if source.connects_to(to) {
            score += LEGAL_CONNECTION_POINTS;
            tests.push(TestResult::pass(
                format!("Valid connection: {} → {}", source.name, catalog::display_name(to)),
                LEGAL_CONNECTION_POINTS,
                "Connection follows best practices",
            ));
        }
    }

    (score.min(SUB_SCORE_CAP), tests)
}

fn check_architecture_patterns(types: &HashSet<&str>) -> (u32, Vec<TestResult>) {
    let mut score = 0;
    let mut tests = Vec::new();

    if ["api-gateway", "web-server", "database"]
        .iter()
        .all(|t| types.contains(t))
    {
        score += 15;
        tests.push(TestResult::pass(
            "Layered architecture",
            15,
            "Proper separation of presentation, application, and data layers",
        ));
    }
    if types.contains("load-balancer") {
        score += 5;
        tests.push(TestResult::pass(
            "Scalability pattern",
            5,
            "Load balancer present for horizontal scaling",
        ));
    }
    if types.contains("cache") {
        score += 5;
        tests.push(TestResult::pass(
            "Performance pattern",
            5,
            "Caching layer present for performance optimization",
        ));
    }

    (score.min(SUB_SCORE_CAP), tests)
}

fn check_best_practices(types: &HashSet<&str>) -> (u32, Vec<TestResult>) {
    const PRACTICES: [(&str, u32, &str, &str); 3] = [
        ("security", 8, "Security layer", "Security layer present"),
        ("cdn", 7, "Content delivery", "CDN present for content delivery"),
        (
            "message-queue",
            10,
            "Asynchronous processing",
            "Message queue present for async processing",
        ),
    ];

    let mut score = 0;
    let mut tests = Vec::new();
    for (kind, points, name, description) in PRACTICES {
        if types.contains(kind) {
            score += points;
            tests.push(TestResult::pass(name, points, description));
        }
    }

    (score.min(SUB_SCORE_CAP), tests)
}
