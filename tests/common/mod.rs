// Shared harness: the full router over an in-memory database and a recording mailer

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use yamdb_api::{
    api::create_router,
    app_state::AppState,
    config::Config,
    core::Role,
    domains::users::{NewUser, User},
    infrastructure::{database::Database, mailer::MemoryMailer},
};

pub struct TestApp {
    pub state: AppState,
    pub mailer: Arc<MemoryMailer>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(Config::default()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let db = Database::in_memory().await.expect("in-memory database");
        let mailer = Arc::new(MemoryMailer::new());
        let state = AppState::from_parts(db, config, mailer.clone());
        Self { state, mailer }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = create_router(self.state.clone())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Insert a user directly and mint a token for it.
    pub async fn user(&self, username: &str, role: Role) -> (User, String) {
        let user = self
            .state
            .users()
            .create(&NewUser {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                role,
                ..NewUser::default()
            })
            .await
            .unwrap();
        let token = self.state.tokens.issue_token(user.id, &user.username).unwrap();
        (user, token)
    }

    pub async fn admin(&self) -> String {
        self.user("admin", Role::Admin).await.1
    }

    /// Code from the most recent mail sent to `email`.
    pub async fn last_code(&self, email: &str) -> String {
        let mail = self.mailer.sent_to(email).await.pop().expect("no mail sent");
        mail.body
            .rsplit(' ')
            .next()
            .expect("code in body")
            .trim()
            .to_string()
    }
}
