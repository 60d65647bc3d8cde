use async_trait::async_trait;
use uuid::Uuid;

use super::domain::AccessToken;
use super::errors::AuthError;

/// Repository abstraction for issued bearer tokens.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn create(&self, user_id: Uuid, name: &str, token_hash: String) -> Result<AccessToken, AuthError>;
    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<AccessToken>, AuthError>;
    /// Stamp `last_used_at`.
    async fn touch(&self, id: Uuid) -> Result<(), AuthError>;
    /// Returns whether a token was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, AuthError>;
}

/// Simple in-memory repository for tests, doc examples and database-less runs
pub mod memory {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    #[derive(Default)]
    pub struct InMemoryTokenRepository {
        tokens: RwLock<HashMap<Uuid, AccessToken>>, // key: token id
    }

    impl InMemoryTokenRepository {
        pub fn new() -> Self { Self::default() }

        pub async fn len(&self) -> usize { self.tokens.read().await.len() }
    }

    #[async_trait]
    impl TokenRepository for InMemoryTokenRepository {
        async fn create(&self, user_id: Uuid, name: &str, token_hash: String) -> Result<AccessToken, AuthError> {
            let mut tokens = self.tokens.write().await;
            if tokens.values().any(|t| t.token_hash == token_hash) {
                return Err(AuthError::TokenError("token collision".into()));
            }
            let token = AccessToken {
                id: Uuid::new_v4(),
                user_id,
                name: name.to_string(),
                token_hash,
                last_used_at: None,
                created_at: Utc::now(),
            };
            tokens.insert(token.id, token.clone());
            Ok(token)
        }

        async fn find_by_hash(&self, token_hash: &str) -> Result<Option<AccessToken>, AuthError> {
            let tokens = self.tokens.read().await;
            Ok(tokens.values().find(|t| t.token_hash == token_hash).cloned())
        }

        async fn touch(&self, id: Uuid) -> Result<(), AuthError> {
            if let Some(t) = self.tokens.write().await.get_mut(&id) {
                t.last_used_at = Some(Utc::now());
            }
            Ok(())
        }

        async fn delete(&self, id: Uuid) -> Result<bool, AuthError> {
            Ok(self.tokens.write().await.remove(&id).is_some())
        }
    }
}
