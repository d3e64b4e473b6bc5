//! Test harness: the real router over the in-memory store, real Argon2
//! hashing and real JWT sessions.
#![cfg(feature = "web-axum")]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use api_adapters::{router, AppState, CookieSettings};
use auth_adapters::{Argon2Hasher, JwtSessionTokens};
use domains::{Identity, Role, SessionTokens, UserRepo};
use services::{Repositories, Services};
use storage_adapters::InMemoryStore;

pub const TEST_SECRET: &[u8] = b"integration-test-secret";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    /// `token=...` pair from `Set-Cookie`, if any.
    pub cookie: Option<String>,
    pub raw_set_cookie: Option<String>,
}

impl TestResponse {
    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let services = Services::new(
            Repositories::from_store(store.clone()),
            Arc::new(Argon2Hasher::new()),
            Arc::new(JwtSessionTokens::new(TEST_SECRET, chrono::Duration::hours(24))),
        );
        let state = AppState::new(
            services,
            CookieSettings {
                ttl_hours: 24,
                secure: false,
            },
        );

        Self {
            router: router(state),
            store,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
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
        let raw_set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let cookie = raw_set_cookie
            .as_deref()
            .and_then(|v| v.split(';').next())
            .map(str::to_string);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse {
            status,
            body,
            cookie,
            raw_set_cookie,
        }
    }

    pub async fn get(&self, uri: &str, cookie: &str) -> TestResponse {
        self.request(Method::GET, uri, None, Some(cookie)).await
    }

    pub async fn post(&self, uri: &str, body: Value, cookie: &str) -> TestResponse {
        self.request(Method::POST, uri, Some(body), Some(cookie)).await
    }

    /// Registers `username` and returns its session cookie.
    pub async fn register(&self, username: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/auth/register",
                Some(serde_json::json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "password123",
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.cookie.expect("register sets a cookie")
    }

    pub async fn user_id(&self, username: &str) -> Uuid {
        self.store
            .find_user_by_username(username)
            .await
            .unwrap()
            .expect("user exists")
            .id
    }

    /// Promotes a registered user to admin. Existing cookies pick the
    /// new role up on their next request.
    pub async fn make_admin(&self, username: &str) {
        let id = self.user_id(username).await;
        assert!(self.store.set_role(id, Role::Admin));
    }

    /// A correctly signed token that expired an hour ago.
    pub fn expired_cookie(&self, identity: &Identity) -> String {
        let issuer = JwtSessionTokens::new(TEST_SECRET, chrono::Duration::hours(-1));
        format!("token={}", issuer.issue_token(identity).unwrap())
    }

    /// A token signed with someone else's key.
    pub fn forged_cookie(&self, identity: &Identity) -> String {
        let issuer = JwtSessionTokens::new(b"not-our-secret", chrono::Duration::hours(1));
        format!("token={}", issuer.issue_token(identity).unwrap())
    }
}
