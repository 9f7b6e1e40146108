//! Static catalog of component types and interview problems.
//!
//! Both tables are immutable and shared process-wide; lookups of unknown ids
//! return `None` and callers treat that as "no rule applies".

use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ComponentType {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub required_connections: &'static [&'static str],
    pub optional_connections: &'static [&'static str],
    pub points: u32,
}

impl ComponentType {
    /// Whether an edge from this type to `target` is a recognised connection.
    pub fn connects_to(&self, target: &str) -> bool {
        self.required_connections
            .iter()
            .chain(self.optional_connections)
            .any(|t| *t == target)
    }
}

/// A stress scenario surfaced to the model judge. Never executed.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TestCase {
    pub id: &'static str,
    pub scenario: &'static str,
    pub evaluation: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Problem {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub required_components: &'static [&'static str],
    pub optional_components: &'static [&'static str],
    pub min_score: u32,
    pub test_cases: &'static [TestCase],
}

pub static COMPONENT_TYPES: &[ComponentType] = &[
    ComponentType {
        id: "api-gateway",
        name: "API Gateway",
        category: "entry",
        required_connections: &["web-server", "load-balancer"],
        optional_connections: &["security", "cache"],
        points: 10,
    },
    ComponentType {
        id: "load-balancer",
        name: "Load Balancer",
        category: "distribution",
        required_connections: &["web-server"],
        optional_connections: &["api-gateway"],
        points: 15,
    },
    ComponentType {
        id: "web-server",
        name: "Web Server",
        category: "compute",
        required_connections: &["database"],
        optional_connections: &["cache", "message-queue", "load-balancer"],
        points: 20,
    },
    ComponentType {
        id: "database",
        name: "Database",
        category: "storage",
        required_connections: &[],
        optional_connections: &["web-server", "cache"],
        points: 25,
    },
    ComponentType {
        id: "cache",
        name: "Cache",
        category: "performance",
        required_connections: &[],
        optional_connections: &["web-server", "database", "api-gateway"],
        points: 15,
    },
    ComponentType {
        id: "message-queue",
        name: "Message Queue",
        category: "async",
        required_connections: &[],
        optional_connections: &["web-server"],
        points: 20,
    },
    ComponentType {
        id: "cdn",
        name: "CDN",
        category: "performance",
        required_connections: &[],
        optional_connections: &["api-gateway"],
        points: 10,
    },
    ComponentType {
        id: "security",
        name: "Security Layer",
        category: "security",
        required_connections: &[],
        optional_connections: &["api-gateway", "web-server"],
        points: 15,
    },
];

pub static PROBLEMS: &[Problem] = &[
    Problem {
        id: "url-shortener",
        title: "Design a URL Shortener",
        description: "Design a URL shortening service like bit.ly",
        required_components: &["api-gateway", "web-server", "database", "cache"],
        optional_components: &["load-balancer", "cdn", "security"],
        min_score: 70,
        test_cases: &[
            TestCase {
                id: "Viral link",
                scenario: "A single short link goes viral and receives 100x the normal redirect \
traffic within five minutes.",
                evaluation: "Can redirects be served without every request reaching the database?",
            },
            TestCase {
                id: "Code collision",
                scenario: "Two users shorten different long URLs at the same instant.",
                evaluation: "How does the design guarantee that the generated short codes are unique?",
            },
            TestCase {
                id: "Database outage",
                scenario: "The primary database is unavailable for five minutes.",
                evaluation: "Do existing short links keep redirecting, and what happens to new writes?",
            },
        ],
    },
    Problem {
        id: "chat-system",
        title: "Design a Chat System",
        description: "Design a real-time messaging system",
        required_components: &["api-gateway", "web-server", "database", "message-queue"],
        optional_components: &["load-balancer", "cache", "security"],
        min_score: 75,
        test_cases: &[
            TestCase {
                id: "Group fan-out",
                scenario: "A message is posted to a group with 10,000 members.",
                evaluation: "How is the message delivered to every member without blocking the sender?",
            },
            TestCase {
                id: "Offline recipient",
                scenario: "The recipient is offline when a direct message is sent and reconnects an \
hour later.",
                evaluation: "Is the message stored and delivered in order after reconnection?",
            },
            TestCase {
                id: "Server crash",
                scenario: "A chat server holding 50,000 open connections crashes.",
                evaluation: "Can clients reconnect elsewhere without losing in-flight messages?",
            },
        ],
    },
    Problem {
        id: "social-media",
        title: "Design a Social Media Feed",
        description: "Design a scalable social media platform",
        required_components: &["api-gateway", "load-balancer", "web-server", "database", "cache"],
        optional_components: &["cdn", "message-queue", "security"],
        min_score: 80,
        test_cases: &[
            TestCase {
                id: "Celebrity post",
                scenario: "An account with 50 million followers publishes a new post.",
                evaluation: "How does the post reach follower feeds without overwhelming the write path?",
            },
            TestCase {
                id: "Global feed latency",
                scenario: "Users on three continents open their home feed at peak hour.",
                evaluation: "Can feed reads stay under 200 ms at p99 for distant users?",
            },
            TestCase {
                id: "Media upload burst",
                scenario: "A live event triggers a burst of photo and video uploads.",
                evaluation: "Where is media stored and served from, and does the burst affect feed reads?",
            },
        ],
    },
];

pub fn component_type(id: &str) -> Option<&'static ComponentType> {
    COMPONENT_TYPES.iter().find(|c| c.id == id)
}

pub fn problem(id: &str) -> Option<&'static Problem> {
    PROBLEMS.iter().find(|p| p.id == id)
}

/// Display name for a type id, or the id itself when the type is unknown.
pub fn display_name(id: &str) -> &str {
    component_type(id).map_or(id, |c| c.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn lookups_resolve_known_ids() {
        assert_eq!(component_type("cdn").map(|c| c.name), Some("CDN"));
        assert_eq!(problem("chat-system").map(|p| p.min_score), Some(75));
    }

    #[test]
    fn unknown_ids_are_not_found() {
        assert!(component_type("quantum-router").is_none());
        assert!(problem("design-twitter").is_none());
        assert_eq!(display_name("quantum-router"), "quantum-router");
    }

    #[test]
    fn ids_are_unique() {
        let types: HashSet<_> = COMPONENT_TYPES.iter().map(|c| c.id).collect();
        assert_eq!(types.len(), COMPONENT_TYPES.len());
        let problems: HashSet<_> = PROBLEMS.iter().map(|p| p.id).collect();
        assert_eq!(problems.len(), PROBLEMS.len());
    }

    #[test]
    fn problems_only_reference_known_types() {
        for p in PROBLEMS {
            for id in p.required_components.iter().chain(p.optional_components) {
                assert!(component_type(id).is_some(), "{} references {}", p.id, id);
            }
            assert!(p.min_score <= 100);
            assert!(!p.test_cases.is_empty());
        }
        for c in COMPONENT_TYPES {
            for id in c.required_connections.iter().chain(c.optional_connections) {
                assert!(component_type(id).is_some(), "{} connects to {}", c.id, id);
            }
        }
    }

    #[test]
    fn connection_legality_covers_required_and_optional() {
        let web = component_type("web-server").unwrap();
        assert!(web.connects_to("database"));
        assert!(web.connects_to("cache"));
        assert!(!web.connects_to("cdn"));
        assert!(!component_type("database").unwrap().connects_to("database"));
    }
}
