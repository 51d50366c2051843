//! HTTP API tests driving the router in-process.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use tasktrack_server::{crypto::MIN_COST, http::create_router, AppState, Config};

struct TestApp {
    state: Arc<AppState>,
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        let state = AppState::new(Config {
            password_cost: MIN_COST,
            ..Config::default()
        });
        let router = create_router(state.clone());
        Self { state, router }
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(body) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };

        let resp = self
            .router
            .clone()
            .oneshot(req.body(body).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    /// Register and log in, returning the bearer token.
    async fn sign_up(&self, email: &str, role: Option<&str>) -> String {
        let mut body = json!({ "email": email, "password": "secret1" });
        if let Some(role) = role {
            body["role"] = json!(role);
        }
        let (status, _) = self
            .call(Method::POST, "/auth/register", None, Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, login) = self
            .call(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({ "email": email, "password": "secret1" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        login["data"]["token"].as_str().unwrap().to_string()
    }

    async fn create_task(&self, token: &str, title: &str) -> Value {
        let (status, body) = self
            .call(
                Method::POST,
                "/tasks",
                Some(token),
                Some(json!({ "title": title, "description": "d" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"].clone()
    }
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();

    let (status, body) = app.call(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_register_hides_password() {
    let app = TestApp::new();

    let (status, body) = app
        .call(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "email": "a@example.com", "password": "secret1" })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["email"], "a@example.com");
    assert_eq!(body["data"]["role"], "user");
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_errors() {
    let app = TestApp::new();
    app.sign_up("a@example.com", None).await;

    let (status, body) = app
        .call(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "email": "a@example.com", "password": "secret1" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (status, body) = app
        .call(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "email": "bad", "password": "secret1" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_input");
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = TestApp::new();
    app.sign_up("a@example.com", None).await;

    let (status, body) = app
        .call(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "a@example.com", "password": "wrong12" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_tasks_require_token() {
    let app = TestApp::new();

    let (status, _) = app.call(Method::GET, "/tasks", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.call(Method::GET, "/tasks", Some("nope"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_task_schedules_auto_completion() {
    let app = TestApp::new();
    let token = app.sign_up("a@example.com", None).await;

    let task = app.create_task(&token, "write report").await;

    assert_eq!(task["status"], "pending");
    assert_eq!(task["title"], "write report");
    assert_eq!(app.state.worker.stats().enqueued, 1);
}

#[tokio::test]
async fn test_create_task_rejects_bad_input() {
    let app = TestApp::new();
    let token = app.sign_up("a@example.com", None).await;

    let (status, body) = app
        .call(Method::POST, "/tasks", Some(&token), Some(json!({ "title": "" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_input");

    let (status, body) = app
        .call(Method::POST, "/tasks", Some(&token), Some(json!({ "nope": 1 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_input");
}

#[tokio::test]
async fn test_users_only_see_own_tasks() {
    let app = TestApp::new();
    let alice = app.sign_up("alice@example.com", None).await;
    let bob = app.sign_up("bob@example.com", None).await;
    let admin = app.sign_up("admin@example.com", Some("admin")).await;

    let task = app.create_task(&alice, "alice's").await;
    app.create_task(&bob, "bob's").await;
    let uri = format!("/tasks/{}", task["id"].as_str().unwrap());

    let (_, list) = app.call(Method::GET, "/tasks", Some(&alice), None).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);

    let (_, list) = app.call(Method::GET, "/tasks", Some(&admin), None).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 2);

    let (status, body) = app.call(Method::GET, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, _) = app.call(Method::GET, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_and_delete_task() {
    let app = TestApp::new();
    let token = app.sign_up("a@example.com", None).await;
    let task = app.create_task(&token, "t").await;
    let uri = format!("/tasks/{}", task["id"].as_str().unwrap());

    let (status, body) = app
        .call(
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({ "status": "in_progress", "title": "renamed" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "in_progress");
    assert_eq!(body["data"]["title"], "renamed");

    let (status, _) = app
        .call(Method::PUT, &uri, Some(&token), Some(json!({ "status": "completed" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .call(Method::PUT, &uri, Some(&token), Some(json!({ "status": "pending" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_transition");

    let (status, _) = app.call(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.call(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_list_filters_and_paging() {
    let app = TestApp::new();
    let token = app.sign_up("a@example.com", None).await;
    for i in 0..3 {
        app.create_task(&token, &format!("t{}", i)).await;
    }

    let (_, body) = app
        .call(Method::GET, "/tasks?limit=2&offset=0", Some(&token), None)
        .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, body) = app
        .call(Method::GET, "/tasks?status=completed", Some(&token), None)
        .await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, _) = app
        .call(Method::GET, "/tasks?status=bogus", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = TestApp::new();
    let token = app.sign_up("a@example.com", None).await;
    app.create_task(&token, "t").await;

    let resp = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("tasktrack_tasks_total{status=\"pending\"} 1"));
    assert!(text.contains("tasktrack_autocomplete_enqueued_total 1"));
}
