use archgrade_core::{Design, Problem, TestCase};

use crate::parse::response_schema;

/// Stand-in stress scenarios when a design is not tied to a catalog problem.
pub(crate) static GENERIC_TEST_CASES: [TestCase; 3] = [
    TestCase {
        id: "Scalability",
        scenario: "Traffic grows tenfold over a single day.",
        evaluation: "Which components become bottlenecks, and can they scale horizontally?",
    },
    TestCase {
        id: "Single point of failure",
        scenario: "Any one component in the design stops responding.",
        evaluation: "Does the system keep serving requests, or does one failure take it down?",
    },
    TestCase {
        id: "Consistency vs availability",
        scenario: "A network partition separates the application tier from its primary data store.",
        evaluation: "Does the design favour consistency or availability, and is that choice appropriate?",
    },
];

const GENERIC_TITLE: &str = "General system design";
const GENERIC_DESCRIPTION: &str =
    "No specific interview problem was selected. Evaluate the design as a general-purpose, \
production-ready web architecture.";

pub fn system_prompt() -> String {
    format!(
        "You are a senior system architect interviewing a candidate. Evaluate the candidate's \
system design diagram, provided as a list of typed components and directed connections.\n\n\
Score these dimensions from 0 to 100:\n\
- scalability: can the design absorb growth in traffic and data?\n\
- reliability: are there single points of failure, and how does it degrade?\n\
- completeness: are the components the problem needs present?\n\
- correctness: do the components and data flows make sense for the problem?\n\n\
Walk through every stress test case and decide whether the design survives it. \
Use the test case id as the result name.\n\n\
Be strict. A design missing a component that a test case clearly depends on fails that case.\n\n\
Output ONLY a JSON object with these fields:\n\
- \"analysis\": a short critique addressed to the candidate\n\
- \"testCaseResults\": an array of {{\"name\", \"passed\", \"description\"}}, one per test case\n\
- \"detailedResults\": {{\"scalability\", \"reliability\", \"completeness\", \"correctness\"}}, integers 0-100\n\
- \"score\": overall integer score 0-100\n\n\
JSON schema:\n{}\n\n\
Output ONLY the JSON object, nothing else.",
        response_schema()
    )
}

pub fn user_message(design: &Design, problem: Option<&Problem>) -> String {
    let mut out = String::with_capacity(2048);

    let (title, description) =
        problem.map_or((GENERIC_TITLE, GENERIC_DESCRIPTION), |p| (p.title, p.description));
    out.push_str("PROBLEM: ");
    out.push_str(title);
    out.push('\n');
    out.push_str("DESCRIPTION: ");
    out.push_str(description);
    out.push_str("\n\n");

    let types: Vec<&str> = design.component_types().collect();
    out.push_str("COMPONENT TYPES: ");
    if types.is_empty() {
        out.push_str("(none)");
    } else {
        out.push_str(&types.join(", "));
    }
    out.push('\n');

    out.push_str("COMPONENTS:\n");
    for component in &design.components {
        out.push_str("- ");
        out.push_str(&component.kind);
        out.push_str(" (id: ");
        out.push_str(&component.id);
        out.push_str(")\n");
    }

    out.push_str("CONNECTIONS:\n");
    if design.connections.is_empty() {
        out.push_str("(none)\n");
    }
    for connection in &design.connections {
        out.push_str("- ");
        out.push_str(connection.from_component.as_deref().unwrap_or("?"));
        out.push_str("->");
        out.push_str(connection.to_component.as_deref().unwrap_or("?"));
        out.push('\n');
    }

    out.push_str("\nSTRESS TEST CASES:\n");
    let cases: &[TestCase] = problem.map_or(&GENERIC_TEST_CASES[..], |p| p.test_cases);
    for case in cases {
        out.push_str("- ");
        out.push_str(case.id);
        out.push_str("\n  Scenario: ");
        out.push_str(case.scenario);
        out.push_str("\n  Evaluation: ");
        out.push_str(case.evaluation);
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use archgrade_core::{catalog, Component, Connection, Position};

    fn sample() -> Design {
        Design {
            components: vec![
                Component {
                    id: "app".to_string(),
                    kind: "web-server".to_string(),
                    position: Position::default(),
                },
                Component {
                    id: "db".to_string(),
                    kind: "database".to_string(),
                    position: Position::default(),
                },
            ],
            connections: vec![
                Connection {
                    from_component: Some("app".to_string()),
                    to_component: Some("db".to_string()),
                },
                Connection {
                    from_component: Some("app".to_string()),
                    to_component: None,
                },
            ],
            problem_id: None,
        }
    }

    #[test]
    fn embeds_problem_and_its_test_cases() {
        let problem = catalog::problem("chat-system").unwrap();
        let msg = user_message(&sample(), Some(problem));
        assert!(msg.contains("PROBLEM: Design a Chat System"));
        assert!(msg.contains("DESCRIPTION: Design a real-time messaging system"));
        for case in problem.test_cases {
            assert!(msg.contains(case.scenario));
            assert!(msg.contains(case.evaluation));
        }
        assert!(!msg.contains(GENERIC_TEST_CASES[0].scenario));
    }

    #[test]
    fn lists_components_and_connections() {
        let msg = user_message(&sample(), None);
        assert!(msg.contains("COMPONENT TYPES: web-server, database"));
        assert!(msg.contains("- web-server (id: app)"));
        assert!(msg.contains("- app->db\n"));
        assert!(msg.contains("- app->?\n"));
    }

    #[test]
    fn falls_back_to_generic_scenarios() {
        let msg = user_message(&Design::default(), None);
        assert!(msg.contains(GENERIC_TITLE));
        assert!(msg.contains("COMPONENT TYPES: (none)"));
        for case in &GENERIC_TEST_CASES {
            assert!(msg.contains(case.id));
        }
    }

    #[test]
    fn system_prompt_names_every_dimension() {
        let prompt = system_prompt();
        for field in [
            "analysis",
            "testCaseResults",
            "detailedResults",
            "scalability",
            "reliability",
            "completeness",
            "correctness",
            "score",
        ] {
            assert!(prompt.contains(field), "{field}");
        }
    }
}
