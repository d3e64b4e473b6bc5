use axum::http::{Method, StatusCode};
use serde_json::json;

use domains::{Identity, Role};
use integration_tests::TestApp;

#[tokio::test]
async fn root_and_auth_routes_need_no_cookie() {
    let app = TestApp::new();

    let root = app.request(Method::GET, "/", None, None).await;
    assert_eq!(root.status, StatusCode::OK);
    assert_eq!(root.body, json!("Hello World"));

    let logout = app.request(Method::POST, "/auth/logout", None, None).await;
    assert_eq!(logout.status, StatusCode::OK);
}

#[tokio::test]
async fn protected_route_without_cookie_is_401() {
    let app = TestApp::new();
    let response = app.request(Method::GET, "/question", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "Access denied. No token provided.");
}

#[tokio::test]
async fn register_sets_a_hardened_session_cookie() {
    let app = TestApp::new();
    let response = app
        .request(
            Method::POST,
            "/auth/register",
            Some(json!({ "username": "alice", "email": "alice@example.com", "password": "password123" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["message"], "User registered and logged in");
    assert_eq!(response.body["user"]["username"], "alice");
    assert!(response.body["user"].get("password_hash").is_none());

    let set_cookie = response.raw_set_cookie.unwrap();
    assert!(set_cookie.starts_with("token="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Strict"));
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("Max-Age=86400"));
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = TestApp::new();
    app.register("alice").await;

    let again = app
        .request(
            Method::POST,
            "/auth/register",
            Some(json!({ "username": "alice", "email": "other@example.com", "password": "password123" })),
            None,
        )
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_with_credentials_and_via_cookie() {
    let app = TestApp::new();
    let cookie = app.register("alice").await;

    let fresh = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({ "email": "alice@example.com", "password": "password123" })),
            None,
        )
        .await;
    assert_eq!(fresh.status, StatusCode::OK);
    assert_eq!(fresh.body["message"], "Login successful");
    assert!(fresh.cookie.is_some());

    let silent = app.request(Method::POST, "/auth/login", None, Some(&cookie)).await;
    assert_eq!(silent.status, StatusCode::OK);
    assert_eq!(silent.body["message"], "User logged in via cookie");
}

#[tokio::test]
async fn wrong_password_is_400() {
    let app = TestApp::new();
    app.register("alice").await;

    let response = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({ "email": "alice@example.com", "password": "nope" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "Invalid email or password");
}

#[tokio::test]
async fn me_returns_identity() {
    let app = TestApp::new();
    let cookie = app.register("alice").await;

    let me = app.get("/auth/me", &cookie).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["user"]["email"], "alice@example.com");
    assert_eq!(me.body["user"]["role"], "user");
}

#[tokio::test]
async fn expired_and_forged_tokens_are_told_apart() {
    let app = TestApp::new();
    app.register("alice").await;
    let identity = Identity {
        id: app.user_id("alice").await,
        username: "alice".into(),
        email: "alice@example.com".into(),
        role: Role::User,
    };

    let expired = app.get("/question", &app.expired_cookie(&identity)).await;
    assert_eq!(expired.status, StatusCode::UNAUTHORIZED);
    assert_eq!(expired.error(), "Token expired.");

    let forged = app.get("/question", &app.forged_cookie(&identity)).await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
    assert_eq!(forged.error(), "Invalid token.");

    let garbage = app.get("/question", "token=garbage").await;
    assert_eq!(garbage.error(), "Invalid token.");
}

#[tokio::test]
async fn token_for_unknown_user_is_rejected() {
    let app = TestApp::new();
    let ghost = Identity {
        id: uuid::Uuid::now_v7(),
        username: "ghost".into(),
        email: "ghost@example.com".into(),
        role: Role::User,
    };
    let issuer = auth_adapters::JwtSessionTokens::new(
        integration_tests::TEST_SECRET,
        chrono::Duration::hours(1),
    );
    let token = domains::SessionTokens::issue_token(&issuer, &ghost).unwrap();

    let response = app.get("/question", &format!("token={token}")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "User not found. Token invalid.");
}

#[tokio::test]
async fn logout_clears_the_cookie() {
    let app = TestApp::new();
    let cookie = app.register("alice").await;

    let response = app.request(Method::POST, "/auth/logout", None, Some(&cookie)).await;
    assert_eq!(response.body["message"], "Logged out successfully");
    let set_cookie = response.raw_set_cookie.unwrap();
    assert!(set_cookie.starts_with("token="));
    assert!(set_cookie.contains("Max-Age=0"));
}
