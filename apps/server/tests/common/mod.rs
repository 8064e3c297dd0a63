#![allow(dead_code)]

use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;
use adscout_server::{api::app_router, auth::AuthManager, build_state, config::Config};

pub const SECRET: &[u8; 32] = b"adscout-integration-test-secret!";

pub struct TestApp {
    pub router: Router,
    pub auth: AuthManager,
    _dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_filter_admins(&[]).await
    }

    pub async fn spawn_with_filter_admins(filter_admins: &[&str]) -> Self {
        let dir = tempdir().unwrap();
        let config = Config {
            listen_addr: "127.0.0.1:0".parse().unwrap(),
            db_path: dir.path().join("test.db").to_string_lossy().into_owned(),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_secs(30),
            static_dir: dir.path().join("dist").to_string_lossy().into_owned(),
            jwt_secret: SECRET.to_vec(),
            filter_admins: filter_admins.iter().map(|u| u.to_string()).collect(),
        };
        let state = build_state(&config).await.unwrap();
        Self {
            router: app_router(state, &config),
            auth: AuthManager::new(SECRET),
            _dir: dir,
        }
    }

    pub fn token(&self, user_id: &str, organization_id: Option<&str>) -> String {
        self.auth
            .issue_token(user_id, organization_id, Duration::from_secs(600))
            .unwrap()
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Creates an organization owned by `user_id` and returns its id.
    pub async fn create_organization(&self, user_id: &str, name: &str) -> String {
        let token = self.token(user_id, None);
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/organizations",
                Some(&token),
                Some(serde_json::json!({ "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["id"].as_str().unwrap().to_string()
    }
}
