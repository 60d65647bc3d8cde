use std::sync::Arc;

use configs::AppConfig;
use service::auth::repository::{memory::InMemoryTokenRepository, TokenRepository};
use service::auth::service::{AuthConfig, AuthService};
use service::users::repository::{memory::InMemoryUserRepository, UserRepository};
use service::users::service::{ListConfig, UserService};

/// Settings for the `auth_token` cookie.
#[derive(Clone, Debug)]
pub struct CookieSettings {
    pub secure: bool,
    pub remember_days: i64,
}

impl From<&configs::AuthConfig> for CookieSettings {
    fn from(c: &configs::AuthConfig) -> Self { Self { secure: c.cookie_secure, remember_days: c.remember_days } }
}

/// Shared handler state; cloning is cheap.
#[derive(Clone)]
pub struct ServerState {
    pub users: Arc<UserService>,
    pub auth: Arc<AuthService>,
    pub cookies: CookieSettings,
}

impl ServerState {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<dyn TokenRepository>, cfg: &AppConfig) -> Self {
        Self {
            users: Arc::new(UserService::new(users.clone(), ListConfig::from(&cfg.pagination))),
            auth: Arc::new(AuthService::new(users, tokens, AuthConfig::from(&cfg.auth))),
            cookies: CookieSettings::from(&cfg.auth),
        }
    }

    pub fn in_memory(cfg: &AppConfig) -> Self {
        Self::new(Arc::new(InMemoryUserRepository::new()), Arc::new(InMemoryTokenRepository::new()), cfg)
    }
}
