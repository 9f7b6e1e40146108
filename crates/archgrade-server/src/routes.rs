use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderValue,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

use archgrade_core::{catalog, ComponentType, Design, Problem, ValidationResult};
use archgrade_judge::Validator;

use crate::error::{ApiError, ApiResult};

const SERVICE_NAME: &str = "AI System Design Validator";

#[derive(Clone)]
pub struct AppState {
    pub validator: Arc<Validator>,
}

pub fn router(state: AppState, cors_origins: Vec<HeaderValue>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/validate", post(validate))
        .route("/problems", get(problems))
        .route("/components", get(components))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Local::now().to_rfc3339(),
    }))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let judge = if state.validator.judge_enabled() {
        "operational"
    } else {
        "disabled"
    };
    Json(json!({
        "status": "healthy",
        "components": {
            "validator": "operational",
            "rules_engine": "operational",
            "pattern_matcher": "operational",
            "llm_judge": judge,
        },
        "problems_available": catalog::PROBLEMS.len(),
        "component_types": catalog::COMPONENT_TYPES.len(),
    }))
}

async fn validate(
    State(state): State<AppState>,
    Json(design): Json<Design>,
) -> ApiResult<Json<ValidationResult>> {
    let design = design.normalized()?;
    tracing::info!(
        components = design.components.len(),
        connections = design.connections.len(),
        problem_id = ?design.problem_id,
        "received validation request"
    );

    // Own task per request so a panic surfaces as a 500 instead of a dropped connection.
    let validator = Arc::clone(&state.validator);
    let result = tokio::spawn(async move { validator.validate(&design).await })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    tracing::info!(score = result.score, passed = result.passed, "validation completed");
    Ok(Json(result))
}

#[derive(Serialize)]
struct ProblemListing {
    problems: BTreeMap<&'static str, &'static Problem>,
    count: usize,
}

async fn problems() -> Json<ProblemListing> {
    let problems: BTreeMap<_, _> = catalog::PROBLEMS.iter().map(|p| (p.id, p)).collect();
    Json(ProblemListing {
        count: problems.len(),
        problems,
    })
}

#[derive(Serialize)]
struct ComponentListing {
    components: BTreeMap<&'static str, &'static ComponentType>,
    count: usize,
}

async fn components() -> Json<ComponentListing> {
    let components: BTreeMap<_, _> = catalog::COMPONENT_TYPES.iter().map(|c| (c.id, c)).collect();
    Json(ComponentListing {
        count: components.len(),
        components,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::Response;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> Router {
        let state = AppState {
            validator: Arc::new(Validator::rules_only()),
        };
        router(
            state,
            vec![HeaderValue::from_static("http://localhost:3000")],
        )
    }

    async fn send(request: Request<Body>) -> Response {
        app().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn root_reports_service() {
        let response = send(get_request("/")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["service"], SERVICE_NAME);
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn health_reports_catalog_sizes() {
        let body = body_json(send(get_request("/health")).await).await;
        assert_eq!(body["problems_available"], 3);
        assert_eq!(body["component_types"], 8);
        assert_eq!(body["components"]["llm_judge"], "disabled");
    }

    #[tokio::test]
    async fn validate_scores_design() {
        let design = r#"{
            "components": [
                {"id": "gw", "type": "api-gateway", "position": {"x": 0, "y": 0}},
                {"id": "app", "type": "web-server", "position": {"x": 100, "y": 0}},
                {"id": "db", "type": "database", "position": {"x": 200, "y": 0}},
                {"id": "c", "type": "cache", "position": {"x": 200, "y": 100}}
            ],
            "connections": [{"from_component": "app", "to_component": "db"}],
            "problem_id": "url-shortener"
        }"#;
        let response = send(post_json("/validate", design)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["score"], 53);
        assert_eq!(body["passed"], false);
        assert_eq!(body["detailed_results"]["connections"], 13);
        assert_eq!(body["detailed_results"]["required_components"], 20);
        assert!(body["feedback"].as_str().unwrap().contains("Not quite there yet"));
        assert!(body["test_results"].as_array().unwrap().len() >= 4);
    }

    #[tokio::test]
    async fn missing_components_is_a_client_error() {
        let response = send(post_json("/validate", r#"{"connections": []}"#)).await;
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn blank_component_id_is_rejected() {
        let design = r#"{"components": [{"id": " ", "type": "cache", "position": {"x": 0, "y": 0}}]}"#;
        let response = send(post_json("/validate", design)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["status"], 400);
        assert!(body["error"].as_str().unwrap().contains("empty id"));
    }

    #[tokio::test]
    async fn problems_are_listed_by_id() {
        let body = body_json(send(get_request("/problems")).await).await;
        assert_eq!(body["count"], 3);
        assert_eq!(body["problems"]["chat-system"]["min_score"], 75);
        assert_eq!(
            body["problems"]["url-shortener"]["test_cases"]
                .as_array()
                .unwrap()
                .len(),
            3
        );
    }

    #[tokio::test]
    async fn components_are_listed_by_id() {
        let body = body_json(send(get_request("/components")).await).await;
        assert_eq!(body["count"], 8);
        assert_eq!(body["components"]["web-server"]["name"], "Web Server");
        assert_eq!(
            body["components"]["web-server"]["required_connections"][0],
            "database"
        );
    }

    #[tokio::test]
    async fn allowed_origin_gets_cors_headers() {
        let request = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .unwrap();
        let response = send(request).await;
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );
    }
}
