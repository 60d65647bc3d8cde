use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::domain::{AuthContext, AuthSession};
use super::errors::AuthError;
use super::repository::TokenRepository;
use super::token::{self, TOKEN_NAME};
use crate::password::{hash_password, verify_dummy, verify_password};
use crate::users::domain::{NewUser, User, UserView};
use crate::users::repository::UserRepository;
use crate::validation::{unique_email, LoginInput, Rules, SignupInput};

/// Auth service configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// Length of issued plaintext tokens
    pub token_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self { Self { token_length: 40 } }
}

impl From<&configs::AuthConfig> for AuthConfig {
    fn from(c: &configs::AuthConfig) -> Self { Self { token_length: c.token_length } }
}

/// Auth business service independent of web framework
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenRepository>,
    cfg: AuthConfig,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<dyn TokenRepository>, cfg: AuthConfig) -> Self {
        Self { users, tokens, cfg }
    }

    async fn issue_token(&self, user: User) -> Result<AuthSession, AuthError> {
        let plain = token::generate(self.cfg.token_length);
        let stored = self.tokens.create(user.id, TOKEN_NAME, token::digest(&plain)).await?;
        debug!(user_id = %user.id, token_id = %stored.id, "token_issued");
        Ok(AuthSession { user: user.into(), token: plain })
    }

    /// Register a new user with a hashed password and issue a token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::memory::InMemoryTokenRepository};
    /// use service::users::repository::memory::InMemoryUserRepository;
    /// use service::validation::SignupInput;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(
    ///     Arc::new(InMemoryUserRepository::new()),
    ///     Arc::new(InMemoryTokenRepository::new()),
    ///     AuthConfig::default(),
    /// );
    /// let input = SignupInput {
    ///     name: "Test".into(),
    ///     email: "User@Example.com".into(),
    ///     password: "Secret123!".into(),
    ///     password_confirmation: "Secret123!".into(),
    /// };
    /// let session = tokio_test::block_on(svc.signup(input)).unwrap();
    /// assert_eq!(session.user.email, "user@example.com");
    /// assert_eq!(session.token.len(), 40);
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn signup(&self, mut input: SignupInput) -> Result<AuthSession, AuthError> {
        input.normalize();
        let mut errors = input.check();
        unique_email(self.users.as_ref(), &input.email, None, &mut errors).await?;
        errors.into_result()?;

        let password_hash = hash_password(&input.password)?;
        let user = self.users.insert(NewUser { name: input.name, email: input.email, password_hash }).await?;
        info!(user_id = %user.id, email = %user.email, "user_registered");
        self.issue_token(user).await
    }

    /// Authenticate a user and issue a token.
    ///
    /// Unknown emails and wrong passwords fail identically.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::memory::InMemoryTokenRepository, AuthError};
    /// use service::users::repository::memory::InMemoryUserRepository;
    /// use service::validation::{LoginInput, SignupInput};
    /// use std::sync::Arc;
    /// let svc = AuthService::new(
    ///     Arc::new(InMemoryUserRepository::new()),
    ///     Arc::new(InMemoryTokenRepository::new()),
    ///     AuthConfig::default(),
    /// );
    /// let _ = tokio_test::block_on(svc.signup(SignupInput {
    ///     name: "N".into(), email: "u@e.com".into(),
    ///     password: "Passw0rd!".into(), password_confirmation: "Passw0rd!".into(),
    /// }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd!".into(), remember: None })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// let wrong = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "nope".into(), remember: None }));
    /// assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email, remember = ?input.remember))]
    pub async fn login(&self, mut input: LoginInput) -> Result<AuthSession, AuthError> {
        input.normalize();
        input.check().into_result()?;

        let Some(user) = self.users.find_by_email(&input.email).await? else {
            verify_dummy(&input.password);
            warn!("login_failed");
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(&input.password, &user.password_hash) {
            warn!(user_id = %user.id, "login_failed");
            return Err(AuthError::InvalidCredentials);
        }
        info!(user_id = %user.id, "user_logged_in");
        self.issue_token(user).await
    }

    /// Revoke a plaintext token. Unknown or already revoked tokens are fine.
    #[instrument(skip_all)]
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        if let Some(stored) = self.tokens.find_by_hash(&token::digest(token)).await? {
            self.tokens.delete(stored.id).await?;
            info!(user_id = %stored.user_id, token_id = %stored.id, "user_logged_out");
        }
        Ok(())
    }

    /// Resolve a bearer token to its user, stamping `last_used_at`.
    #[instrument(skip_all)]
    pub async fn current_user(&self, token: &str) -> Result<AuthContext, AuthError> {
        if token.is_empty() {
            return Err(AuthError::Unauthenticated);
        }
        let stored = self
            .tokens
            .find_by_hash(&token::digest(token))
            .await?
            .ok_or(AuthError::Unauthenticated)?;
        let user = self.users.find_by_id(stored.user_id).await?.ok_or(AuthError::Unauthenticated)?;
        self.tokens.touch(stored.id).await?;
        Ok(AuthContext { user: UserView::from(user), token_id: stored.id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::memory::InMemoryTokenRepository;
    use crate::users::repository::memory::InMemoryUserRepository;

    struct Fixture {
        svc: AuthService,
        users: Arc<InMemoryUserRepository>,
        tokens: Arc<InMemoryTokenRepository>,
    }

    fn fixture() -> Fixture {
        let users = Arc::new(InMemoryUserRepository::new());
        let tokens = Arc::new(InMemoryTokenRepository::new());
        let svc = AuthService::new(users.clone(), tokens.clone(), AuthConfig::default());
        Fixture { svc, users, tokens }
    }

    fn signup_input(email: &str) -> SignupInput {
        SignupInput {
            name: "John Doe".into(),
            email: email.into(),
            password: "Secret123!".into(),
            password_confirmation: "Secret123!".into(),
        }
    }

    fn login_input(email: &str, password: &str) -> LoginInput {
        LoginInput { email: email.into(), password: password.into(), remember: None }
    }

    #[tokio::test]
    async fn signup_stores_hash_and_issues_token() {
        let f = fixture();
        let session = f.svc.signup(signup_input("john@example.com")).await.unwrap();
        let stored = f.users.find_by_email("john@example.com").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "Secret123!");
        assert!(verify_password("Secret123!", &stored.password_hash));

        let token = f.tokens.find_by_hash(&token::digest(&session.token)).await.unwrap().unwrap();
        assert_eq!(token.user_id, stored.id);
        assert_eq!(token.name, "main");
        assert_ne!(token.token_hash, session.token);
    }

    #[tokio::test]
    async fn signup_rejects_duplicate_email() {
        let f = fixture();
        f.svc.signup(signup_input("john@example.com")).await.unwrap();
        let err = f.svc.signup(signup_input("John@Example.com")).await.unwrap_err();
        match err {
            AuthError::Validation(fields) => assert!(fields.contains("email")),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(f.tokens.len().await, 1);
    }

    #[tokio::test]
    async fn signup_validation_creates_nothing() {
        let f = fixture();
        let mut input = signup_input("john@example.com");
        input.password_confirmation = "Mismatch1!".into();
        assert!(matches!(f.svc.signup(input).await, Err(AuthError::Validation(_))));
        assert_eq!(f.users.count().await.unwrap(), 0);
        assert_eq!(f.tokens.len().await, 0);
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let f = fixture();
        f.svc.signup(signup_input("john@example.com")).await.unwrap();

        let wrong_password = f.svc.login(login_input("john@example.com", "Wrong123!")).await.unwrap_err();
        let unknown_email = f.svc.login(login_input("nobody@example.com", "Secret123!")).await.unwrap_err();
        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn login_is_case_insensitive_on_email() {
        let f = fixture();
        f.svc.signup(signup_input("john@example.com")).await.unwrap();
        let session = f.svc.login(login_input("  JOHN@example.com ", "Secret123!")).await.unwrap();
        assert_eq!(session.user.email, "john@example.com");
    }

    #[tokio::test]
    async fn login_validates_payload() {
        let f = fixture();
        let err = f.svc.login(login_input("", "")).await.unwrap_err();
        match err {
            AuthError::Validation(fields) => {
                assert!(fields.contains("email"));
                assert!(fields.contains("password"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn current_user_touches_token_and_logout_revokes() {
        let f = fixture();
        let session = f.svc.signup(signup_input("john@example.com")).await.unwrap();

        let ctx = f.svc.current_user(&session.token).await.unwrap();
        assert_eq!(ctx.user.email, "john@example.com");
        let stored = f.tokens.find_by_hash(&token::digest(&session.token)).await.unwrap().unwrap();
        assert!(stored.last_used_at.is_some());

        f.svc.logout(&session.token).await.unwrap();
        assert!(matches!(f.svc.current_user(&session.token).await, Err(AuthError::Unauthenticated)));
        // second logout is a no-op
        f.svc.logout(&session.token).await.unwrap();
    }

    #[tokio::test]
    async fn tokens_of_deleted_users_stop_working() {
        let f = fixture();
        let session = f.svc.signup(signup_input("john@example.com")).await.unwrap();
        f.users.delete(session.user.id).await.unwrap();
        assert!(matches!(f.svc.current_user(&session.token).await, Err(AuthError::Unauthenticated)));
        assert!(matches!(f.svc.current_user("").await, Err(AuthError::Unauthenticated)));
        assert!(matches!(f.svc.current_user("garbage").await, Err(AuthError::Unauthenticated)));
    }
}
