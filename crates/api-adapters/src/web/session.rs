//! The session cookie and the gate extractor.
//!
//! Handlers that take [`CurrentUser`] only run for callers with a valid
//! `token` cookie; everyone else gets a 401 with the specific cause.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use domains::Identity;

use super::error::ApiError;
use super::AppState;

pub const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Clone, Copy)]
pub struct CookieSettings {
    /// Session lifetime; also the cookie `Max-Age`.
    pub ttl_hours: i64,
    pub secure: bool,
}

impl CookieSettings {
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((TOKEN_COOKIE, token))
            .http_only(true)
            .same_site(SameSite::Strict)
            .path("/")
            .max_age(time::Duration::hours(self.ttl_hours))
            .secure(self.secure)
            .build()
    }

    pub fn cleared(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build(TOKEN_COOKIE).path("/"))
    }
}

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(TOKEN_COOKIE).map(|c| c.value().to_string());

        let identity = state.services.auth.authenticate(token.as_deref()).await?;
        Ok(Self(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_attributes() {
        let settings = CookieSettings {
            ttl_hours: 24,
            secure: false,
        };
        let cookie = settings.session_cookie("abc".into());

        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::hours(24)));
        assert_eq!(cookie.secure(), Some(false));
    }
}
