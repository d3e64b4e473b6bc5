use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use domains::{AppError, Identity};
use services::{Registration, Session};

use crate::web::error::{ApiJson, ApiResult};
use crate::web::handlers::MessageResponse;
use crate::web::session::{CurrentUser, TOKEN_COOKIE};
use crate::web::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub message: &'static str,
    pub user: Identity,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: Identity,
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, CookieJar, Json<SessionResponse>)> {
    let Session { identity, token } = state
        .services
        .auth
        .register(Registration {
            username: body.username,
            email: body.email,
            password: body.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        jar.add(state.cookies.session_cookie(token)),
        Json(SessionResponse {
            message: "User registered and logged in",
            user: identity,
        }),
    ))
}

/// A still-valid cookie logs the caller in without reading the body.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> ApiResult<(CookieJar, Json<SessionResponse>)> {
    if let Some(token) = jar.get(TOKEN_COOKIE).map(|c| c.value().to_string()) {
        if let Ok(identity) = state.services.auth.authenticate(Some(&token)).await {
            return Ok((
                jar,
                Json(SessionResponse {
                    message: "User logged in via cookie",
                    user: identity,
                }),
            ));
        }
    }

    let credentials: LoginRequest = if body.is_empty() {
        LoginRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::ValidationError(format!("Invalid JSON body: {e}")))?
    };

    let Session { identity, token } = state
        .services
        .auth
        .login(&credentials.email, &credentials.password)
        .await?;

    Ok((
        jar.add(state.cookies.session_cookie(token)),
        Json(SessionResponse {
            message: "Login successful",
            user: identity,
        }),
    ))
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    (
        state.cookies.cleared(jar),
        Json(MessageResponse {
            message: "Logged out successfully",
        }),
    )
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<MeResponse> {
    Json(MeResponse { user })
}
