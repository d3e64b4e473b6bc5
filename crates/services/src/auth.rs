//! # Auth Service
//!
//! Registration, login and the session gate. The gate's output is an
//! `Identity` value that callers thread through to every other service.

use std::sync::Arc;

use domains::{
    AppError, CredentialHasher, Identity, Result, SessionTokens, TokenError, User, UserRepo,
};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// A freshly authenticated caller plus the token to hand back in a cookie.
#[derive(Debug, Clone)]
pub struct Session {
    pub identity: Identity,
    pub token: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepo>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn SessionTokens>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepo>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn SessionTokens>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    pub async fn register(&self, input: Registration) -> Result<Session> {
        let username = input.username.trim().to_string();
        let email = input.email.trim().to_lowercase();
        validate_registration(&username, &email, &input.password)?;

        if self.users.find_user_by_username(&username).await?.is_some() {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }
        if self.users.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let hash = self.hasher.hash_password(&input.password)?;
        let user = User::new(username, email, hash);
        let identity = Identity::from(&user);
        self.users.insert_user(user).await?;

        tracing::info!(user_id = %identity.id, username = %identity.username, "user registered");
        self.open_session(identity)
    }

    /// Credential login. Unknown email and wrong password get the same
    /// answer.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::ValidationError(
                "Email and password are required".to_string(),
            ));
        }

        let rejected = || AppError::ValidationError("Invalid email or password".to_string());
        let user = self.users.find_user_by_email(&email).await?.ok_or_else(rejected)?;
        if !self.hasher.verify_password(password, &user.password_hash)? {
            return Err(rejected());
        }

        tracing::info!(user_id = %user.id, "user logged in");
        self.open_session(Identity::from(&user))
    }

    /// The session gate: verifies the token, then re-reads the user so a
    /// deleted account cannot keep using an old cookie.
    pub async fn authenticate(&self, token: Option<&str>) -> Result<Identity> {
        let token = token.filter(|t| !t.is_empty()).ok_or(TokenError::Missing)?;
        let claims = self.tokens.verify_token(token)?;

        let user = self
            .users
            .find_user(claims.id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found. Token invalid.".to_string()))?;

        Ok(Identity::from(&user))
    }

    fn open_session(&self, identity: Identity) -> Result<Session> {
        let token = self.tokens.issue_token(&identity)?;
        Ok(Session { identity, token })
    }
}

fn validate_registration(username: &str, email: &str, password: &str) -> Result<()> {
    if username.is_empty() {
        return Err(AppError::ValidationError("Username is required".to_string()));
    }
    // Usernames must be mentionable with @name.
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(AppError::ValidationError(
            "Username may only contain letters, digits and underscores".to_string(),
        ));
    }
    let valid_email = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid_email {
        return Err(AppError::ValidationError("A valid email is required".to_string()));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::ValidationError(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{MockCredentialHasher, MockSessionTokens, MockUserRepo, Role};
    use uuid::Uuid;

    fn service(users: MockUserRepo, hasher: MockCredentialHasher, tokens: MockSessionTokens) -> AuthService {
        AuthService::new(Arc::new(users), Arc::new(hasher), Arc::new(tokens))
    }

    fn stored_user() -> User {
        User::new("alice".into(), "alice@example.com".into(), "hash".into())
    }

    #[tokio::test]
    async fn register_hashes_and_issues_token() {
        let mut users = MockUserRepo::new();
        users.expect_find_user_by_username().returning(|_| Ok(None));
        users.expect_find_user_by_email().returning(|_| Ok(None));
        users
            .expect_insert_user()
            .withf(|u| u.password_hash == "hashed" && u.role == Role::User)
            .times(1)
            .returning(|_| Ok(()));
        let mut hasher = MockCredentialHasher::new();
        hasher.expect_hash_password().returning(|_| Ok("hashed".into()));
        let mut tokens = MockSessionTokens::new();
        tokens.expect_issue_token().returning(|_| Ok("signed".into()));

        let session = service(users, hasher, tokens)
            .register(Registration {
                username: "alice".into(),
                email: "Alice@Example.com".into(),
                password: "hunter22".into(),
            })
            .await
            .unwrap();

        assert_eq!(session.token, "signed");
        assert_eq!(session.identity.email, "alice@example.com");
    }

    #[tokio::test]
    async fn register_rejects_duplicate_username() {
        let mut users = MockUserRepo::new();
        users
            .expect_find_user_by_username()
            .returning(|_| Ok(Some(stored_user())));

        let err = service(users, MockCredentialHasher::new(), MockSessionTokens::new())
            .register(Registration {
                username: "alice".into(),
                email: "other@example.com".into(),
                password: "hunter22".into(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn registration_validation() {
        assert!(validate_registration("bob", "bob@example.com", "secret1").is_ok());
        assert!(validate_registration("", "bob@example.com", "secret1").is_err());
        assert!(validate_registration("bob smith", "bob@example.com", "secret1").is_err());
        assert!(validate_registration("bob", "not-an-email", "secret1").is_err());
        assert!(validate_registration("bob", "bob@example.com", "short").is_err());
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_rejected() {
        let mut users = MockUserRepo::new();
        users
            .expect_find_user_by_email()
            .returning(|_| Ok(Some(stored_user())));
        let mut hasher = MockCredentialHasher::new();
        hasher.expect_verify_password().returning(|_, _| Ok(false));

        let err = service(users, hasher, MockSessionTokens::new())
            .login("alice@example.com", "wrong")
            .await
            .unwrap_err();

        assert_eq!(err.public_message(), "Invalid email or password");
    }

    #[tokio::test]
    async fn gate_without_token_reports_missing() {
        let err = service(MockUserRepo::new(), MockCredentialHasher::new(), MockSessionTokens::new())
            .authenticate(None)
            .await
            .unwrap_err();

        assert_eq!(err.public_message(), "Access denied. No token provided.");
    }

    #[tokio::test]
    async fn gate_passes_through_token_cause() {
        let mut tokens = MockSessionTokens::new();
        tokens.expect_verify_token().returning(|_| Err(TokenError::Expired));

        let err = service(MockUserRepo::new(), MockCredentialHasher::new(), tokens)
            .authenticate(Some("stale"))
            .await
            .unwrap_err();

        assert_eq!(err.public_message(), "Token expired.");
    }

    #[tokio::test]
    async fn gate_rejects_deleted_accounts() {
        let claims = Identity {
            id: Uuid::now_v7(),
            username: "ghost".into(),
            email: "ghost@example.com".into(),
            role: Role::User,
        };
        let mut tokens = MockSessionTokens::new();
        tokens
            .expect_verify_token()
            .returning(move |_| Ok(claims.clone()));
        let mut users = MockUserRepo::new();
        users.expect_find_user().returning(|_| Ok(None));

        let err = service(users, MockCredentialHasher::new(), tokens)
            .authenticate(Some("valid-but-orphaned"))
            .await
            .unwrap_err();

        assert_eq!(err.public_message(), "User not found. Token invalid.");
    }

    #[tokio::test]
    async fn gate_uses_current_role() {
        let mut admin = stored_user();
        admin.role = Role::Admin;
        let claims = Identity {
            role: Role::User,
            ..Identity::from(&admin)
        };
        let mut tokens = MockSessionTokens::new();
        tokens
            .expect_verify_token()
            .returning(move |_| Ok(claims.clone()));
        let mut users = MockUserRepo::new();
        users
            .expect_find_user()
            .returning(move |_| Ok(Some(admin.clone())));

        let identity = service(users, MockCredentialHasher::new(), tokens)
            .authenticate(Some("token"))
            .await
            .unwrap();

        assert!(identity.is_admin());
    }
}
