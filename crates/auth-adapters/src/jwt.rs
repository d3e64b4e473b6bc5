//! HS256 session tokens.
//!
//! Claims carry the caller's identity so the gate can report what the
//! token said, but the service still re-reads the user before trusting
//! it. Expiry is checked with zero leeway.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domains::{AppError, Identity, Result, Role, SessionTokens, TokenError};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id
    sub: String,
    username: String,
    email: String,
    role: Role,
    iat: i64,
    exp: i64,
}

pub struct JwtSessionTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtSessionTokens {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl SessionTokens for JwtSessionTokens {
    fn issue_token(&self, identity: &Identity) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: identity.id.to_string(),
            username: identity.username.clone(),
            email: identity.email.clone(),
            role: identity.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("token signing failed: {e}")))
    }

    fn verify_token(&self, token: &str) -> std::result::Result<Identity, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => {
                    tracing::debug!(error = %e, "session token rejected");
                    TokenError::Invalid
                }
            }
        })?;

        let claims = data.claims;
        let id = Uuid::parse_str(&claims.sub).map_err(|_| TokenError::Invalid)?;
        Ok(Identity {
            id,
            username: claims.username,
            email: claims.email,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity {
            id: Uuid::now_v7(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            role: Role::Admin,
        }
    }

    #[test]
    fn issued_token_verifies() {
        let tokens = JwtSessionTokens::new(b"test-secret", Duration::hours(24));
        let me = identity();
        let token = tokens.issue_token(&me).unwrap();
        assert_eq!(tokens.verify_token(&token).unwrap(), me);
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let tokens = JwtSessionTokens::new(b"test-secret", Duration::hours(-1));
        let token = tokens.issue_token(&identity()).unwrap();
        assert_eq!(tokens.verify_token(&token), Err(TokenError::Expired));
    }

    #[test]
    fn foreign_signature_is_invalid() {
        let ours = JwtSessionTokens::new(b"test-secret", Duration::hours(1));
        let theirs = JwtSessionTokens::new(b"other-secret", Duration::hours(1));
        let token = theirs.issue_token(&identity()).unwrap();
        assert_eq!(ours.verify_token(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn garbage_is_invalid() {
        let tokens = JwtSessionTokens::new(b"test-secret", Duration::hours(1));
        assert_eq!(tokens.verify_token("not.a.jwt"), Err(TokenError::Invalid));
    }
}
