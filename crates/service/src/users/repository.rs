use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{NewUser, User, UserChanges};
use crate::errors::ServiceError;
use crate::pagination::Pagination;

/// Repository abstraction for user persistence.
///
/// `list` receives an already-trimmed search term; `None` lists everything.
/// Implementations order newest first and report the total match count.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: NewUser) -> Result<User, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError>;
    async fn email_taken(&self, email: &str, except: Option<Uuid>) -> Result<bool, ServiceError>;
    /// `Ok(None)` when `id` does not exist.
    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, ServiceError>;
    /// Returns whether a record was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
    async fn list(&self, search: Option<&str>, page: Pagination, max_per_page: u32) -> Result<(Vec<User>, u64), ServiceError>;
    async fn count(&self) -> Result<u64, ServiceError>;
}

/// In-memory store for tests and database-less development.
pub mod memory {
    use super::*;
    use chrono::Utc;
    use tokio::sync::RwLock;

    use crate::validation::FieldErrors;

    /// Records kept in insertion order; the uniqueness check and the write
    /// happen under the same lock.
    #[derive(Default)]
    pub struct InMemoryUserRepository {
        users: RwLock<Vec<User>>,
    }

    impl InMemoryUserRepository {
        pub fn new() -> Self { Self::default() }
    }

    fn matches(user: &User, needle: &str) -> bool {
        user.name.to_lowercase().contains(needle) || user.email.to_lowercase().contains(needle)
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn insert(&self, user: NewUser) -> Result<User, ServiceError> {
            let mut users = self.users.write().await;
            if users.iter().any(|u| u.email == user.email) {
                return Err(ServiceError::Validation(FieldErrors::taken("email")));
            }
            let now = Utc::now();
            let created = User {
                id: Uuid::new_v4(),
                name: user.name,
                email: user.email,
                password_hash: user.password_hash,
                created_at: now,
                updated_at: now,
            };
            users.push(created.clone());
            Ok(created)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ServiceError> {
            Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
            Ok(self.users.read().await.iter().find(|u| u.email == email).cloned())
        }

        async fn email_taken(&self, email: &str, except: Option<Uuid>) -> Result<bool, ServiceError> {
            let users = self.users.read().await;
            Ok(users.iter().any(|u| u.email == email && Some(u.id) != except))
        }

        async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, ServiceError> {
            let mut users = self.users.write().await;
            if users.iter().any(|u| u.email == changes.email && u.id != id) {
                return Err(ServiceError::Validation(FieldErrors::taken("email")));
            }
            let Some(user) = users.iter_mut().find(|u| u.id == id) else {
                return Ok(None);
            };
            user.name = changes.name;
            user.email = changes.email;
            if let Some(hash) = changes.password_hash {
                user.password_hash = hash;
            }
            user.updated_at = Utc::now();
            Ok(Some(user.clone()))
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            let mut users = self.users.write().await;
            let before = users.len();
            users.retain(|u| u.id != id);
            Ok(users.len() != before)
        }

        async fn list(&self, search: Option<&str>, page: Pagination, max_per_page: u32) -> Result<(Vec<User>, u64), ServiceError> {
            let (idx, per_page) = page.normalize_with(max_per_page);
            let needle = search.map(str::to_lowercase);
            let users = self.users.read().await;
            let hits: Vec<&User> = users
                .iter()
                .rev()
                .filter(|u| needle.as_deref().map_or(true, |n| matches(u, n)))
                .collect();
            let total = hits.len() as u64;
            let data = hits
                .into_iter()
                .skip((idx * per_page) as usize)
                .take(per_page as usize)
                .cloned()
                .collect();
            Ok((data, total))
        }

        async fn count(&self) -> Result<u64, ServiceError> {
            Ok(self.users.read().await.len() as u64)
        }
    }
}
