use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header::CONTENT_TYPE, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::auth::extractor::TOKEN_HEADER;
use crate::auth::password::fast_hasher;
use crate::auth::token::TokenKeys;
use crate::github::GithubClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::memory::MemoryStore;

pub const PASSWORD: &str = "Password123!";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub tokens: TokenKeys,
}

pub fn test_app() -> TestApp {
    let github =
        GithubClient::new("id".to_string(), "secret".to_string()).expect("build github client");
    test_app_with_github(github)
}

pub fn test_app_with_github(github: GithubClient) -> TestApp {
    let store = Arc::new(MemoryStore::default());
    let tokens = TokenKeys::new("test-secret", 3600);
    let state = AppState {
        store: store.clone(),
        hasher: Arc::new(fast_hasher()),
        tokens: tokens.clone(),
        github,
    };

    TestApp {
        router: build_router(state),
        store,
        tokens,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(TOKEN_HEADER, token);
        }
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        self.dispatch(request).await
    }

    pub async fn dispatch(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse { status, body }
    }

    /// Registers a user and returns its token.
    pub async fn register(&self, name: &str, email: &str) -> String {
        let res = self
            .send(
                Method::POST,
                "/api/users",
                None,
                Some(json!({ "name": name, "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "register failed: {}", res.body);
        res.body["token"].as_str().expect("token").to_string()
    }

    pub async fn create_profile(&self, token: &str) -> Value {
        let res = self
            .send(
                Method::POST,
                "/api/profile",
                Some(token),
                Some(json!({ "status": "Developer", "skills": "js, node" })),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "create profile failed: {}", res.body);
        res.body
    }

    pub async fn add_experience(&self, token: &str, title: &str) -> Value {
        let res = self
            .send(
                Method::PUT,
                "/api/profile/experience",
                Some(token),
                Some(json!({ "title": title, "company": "Acme", "from": "2020-01-01" })),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "add experience failed: {}", res.body);
        res.body
    }
}

pub fn titles(records: &Value) -> Vec<String> {
    records
        .as_array()
        .expect("array")
        .iter()
        .map(|r| r["title"].as_str().unwrap_or_default().to_string())
        .collect()
}
