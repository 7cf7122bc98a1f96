//! Axum router configuration with middleware.
//!
//! Routes:
//! - `/defs`, `/defs/{id}`: register and read workflow definitions
//! - `/instances`, `/instances/{id}`: create, list, and read instances
//! - `/instances/{id}/actions/{action_id}`: drive an instance
//! - `/health`: liveness probe
//!
//! Middleware: CORS (allow-any unless disabled in config) and request tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use flowstate_types::config::ServerConfig;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = if config.cors_allow_any {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route(
            "/defs",
            post(handlers::definition::create_definition)
                .get(handlers::definition::list_definitions),
        )
        .route("/defs/{id}", get(handlers::definition::get_definition))
        .route(
            "/instances",
            post(handlers::instance::create_instance).get(handlers::instance::list_instances),
        )
        .route("/instances/{id}", get(handlers::instance::get_instance))
        .route(
            "/instances/{id}/actions/{action_id}",
            post(handlers::instance::apply_action),
        )
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn test_router() -> Router {
        build_router(AppState::new(), &ServerConfig::default())
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let resp = app.clone().oneshot(request).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn pizza_order() -> Value {
        json!({
            "id": "pizza_order",
            "states": [
                {"id": "new", "isInitial": true, "isFinal": false},
                {"id": "done", "isInitial": false, "isFinal": true}
            ],
            "actions": [
                {"id": "complete", "fromStates": ["new"], "toState": "done"}
            ]
        })
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let (status, body) = send(&test_router(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn pizza_order_scenario() {
        let app = test_router();

        let (status, body) = send(&app, "POST", "/defs", Some(pizza_order())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "added", "id": "pizza_order"}));

        let (status, instance) = send(&app, "POST", "/instances?defId=pizza_order", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(instance["defId"], "pizza_order");
        assert_eq!(instance["currentState"], "new");
        assert_eq!(instance["history"], json!([]));
        let id = instance["id"].as_str().unwrap().to_string();

        let uri = format!("/instances/{id}/actions/complete");
        let (status, updated) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["currentState"], "done");
        assert_eq!(updated["history"].as_array().unwrap().len(), 1);
        assert_eq!(updated["history"][0]["actionId"], "complete");

        let (status, body) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Action not allowed from current state");

        let (status, current) = send(&app, "GET", &format!("/instances/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(current, updated);
    }

    #[tokio::test]
    async fn duplicate_definition_is_rejected() {
        let app = test_router();
        send(&app, "POST", "/defs", Some(pizza_order())).await;

        let (status, body) = send(&app, "POST", "/defs", Some(pizza_order())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Definition already exists");
    }

    #[tokio::test]
    async fn invalid_definitions_are_rejected() {
        let app = test_router();

        let mut dangling = pizza_order();
        dangling["actions"][0]["toState"] = json!("cancelled");
        let (status, body) = send(&app, "POST", "/defs", Some(dangling)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("cancelled"));

        let (status, body) = send(&app, "POST", "/defs", Some(json!({"states": []}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn create_instance_errors() {
        let app = test_router();

        let (status, body) = send(&app, "POST", "/instances?defId=missing", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Definition not found");

        let (status, body) = send(&app, "POST", "/instances", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("defId"));

        let mut no_initial = pizza_order();
        no_initial["states"][0]["isInitial"] = json!(false);
        send(&app, "POST", "/defs", Some(no_initial)).await;
        let (status, body) = send(&app, "POST", "/instances?defId=pizza_order", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Initial state missing");
    }

    #[tokio::test]
    async fn apply_action_errors() {
        let app = test_router();

        let (status, body) = send(&app, "POST", "/instances/nope/actions/complete", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Instance not found");

        send(&app, "POST", "/defs", Some(pizza_order())).await;
        let (_, instance) = send(&app, "POST", "/instances?defId=pizza_order", None).await;
        let id = instance["id"].as_str().unwrap();

        let uri = format!("/instances/{id}/actions/refund");
        let (status, body) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid action");
    }

    #[tokio::test]
    async fn malformed_query_is_a_json_error() {
        let app = test_router();
        send(&app, "POST", "/defs", Some(pizza_order())).await;

        let uri = "/instances?defId=pizza_order&defId=other";
        let (status, body) = send(&app, "POST", uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("defId"));

        let (status, body) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn undecodable_path_ids_are_not_found() {
        let app = test_router();

        let (status, body) = send(&app, "POST", "/instances/%FF/actions/complete", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Instance not found"}));

        let (status, body) = send(&app, "GET", "/instances/%FF", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Instance not found"}));

        let (status, body) = send(&app, "GET", "/defs/%FF", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Definition not found"}));
    }

    #[tokio::test]
    async fn read_endpoints() {
        let app = test_router();

        let (status, body) = send(&app, "GET", "/defs/pizza_order", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Definition not found");

        send(&app, "POST", "/defs", Some(pizza_order())).await;
        let (status, def) = send(&app, "GET", "/defs/pizza_order", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(def, pizza_order());

        let (_, defs) = send(&app, "GET", "/defs", None).await;
        assert_eq!(defs.as_array().unwrap().len(), 1);

        send(&app, "POST", "/instances?defId=pizza_order", None).await;
        send(&app, "POST", "/instances?defId=pizza_order", None).await;
        let (_, all) = send(&app, "GET", "/instances", None).await;
        assert_eq!(all.as_array().unwrap().len(), 2);
        let (_, none) = send(&app, "GET", "/instances?defId=other", None).await;
        assert_eq!(none, json!([]));

        let (status, body) = send(&app, "GET", "/instances/unknown", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Instance not found");
    }

    #[tokio::test]
    async fn cors_allows_any_origin_by_default() {
        let app = test_router();
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("origin", "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            resp.headers()
                .get("access-control-allow-origin")
                .map(|v| v.to_str().unwrap()),
            Some("*")
        );
    }
}
