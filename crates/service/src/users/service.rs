use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use super::domain::{ListUsersQuery, NewUser, UserChanges, UserView};
use super::repository::UserRepository;
use crate::errors::ServiceError;
use crate::pagination::{Page, PageMeta, Pagination};
use crate::password::hash_password;
use crate::validation::{unique_email, CreateUserInput, Rules, UpdateUserInput};

/// Listing defaults, usually taken from `configs::PaginationConfig`.
#[derive(Clone, Copy, Debug)]
pub struct ListConfig {
    pub per_page: u32,
    pub max_per_page: u32,
}

impl Default for ListConfig {
    fn default() -> Self { Self { per_page: 10, max_per_page: 100 } }
}

impl From<&configs::PaginationConfig> for ListConfig {
    fn from(c: &configs::PaginationConfig) -> Self {
        Self { per_page: c.per_page, max_per_page: c.max_per_page }
    }
}

/// User management independent of the web framework.
pub struct UserService {
    users: Arc<dyn UserRepository>,
    cfg: ListConfig,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, cfg: ListConfig) -> Self { Self { users, cfg } }

    /// Paginated listing, optionally filtered by a search term.
    ///
    /// # Examples
    /// ```
    /// use service::users::{repository::memory::InMemoryUserRepository, service::{ListConfig, UserService}, ListUsersQuery};
    /// use std::sync::Arc;
    /// let svc = UserService::new(Arc::new(InMemoryUserRepository::new()), ListConfig::default());
    /// let page = tokio_test::block_on(svc.list(ListUsersQuery::default())).unwrap();
    /// assert_eq!(page.meta.total, 0);
    /// assert_eq!(page.meta.last_page, 1);
    /// ```
    #[instrument(skip(self, query), fields(search = ?query.term()))]
    pub async fn list(&self, query: ListUsersQuery) -> Result<Page<UserView>, ServiceError> {
        let page = Pagination {
            page: query.page.unwrap_or(1),
            per_page: query.per_page.unwrap_or(self.cfg.per_page),
        };
        let (idx, per_page) = page.normalize_with(self.cfg.max_per_page);
        let (rows, total) = self.users.list(query.term(), page, self.cfg.max_per_page).await?;
        Ok(Page { data: rows.into_iter().map(UserView::from).collect(), meta: PageMeta::new(idx, per_page, total) })
    }

    pub async fn get(&self, id: Uuid) -> Result<UserView, ServiceError> {
        self.users
            .find_by_id(id)
            .await?
            .map(UserView::from)
            .ok_or_else(|| ServiceError::not_found("User"))
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create(&self, mut input: CreateUserInput) -> Result<UserView, ServiceError> {
        input.normalize();
        let mut errors = input.check();
        unique_email(self.users.as_ref(), &input.email, None, &mut errors).await?;
        errors.into_result()?;

        let password_hash = hash_password(&input.password)?;
        let user = self.users.insert(NewUser { name: input.name, email: input.email, password_hash }).await?;
        info!(user_id = %user.id, email = %user.email, "user_created");
        Ok(user.into())
    }

    /// Missing ids fail before validation runs.
    #[instrument(skip(self, input), fields(user_id = %id))]
    pub async fn update(&self, id: Uuid, mut input: UpdateUserInput) -> Result<UserView, ServiceError> {
        if self.users.find_by_id(id).await?.is_none() {
            return Err(ServiceError::not_found("User"));
        }
        input.normalize();
        let mut errors = input.check();
        unique_email(self.users.as_ref(), &input.email, Some(id), &mut errors).await?;
        errors.into_result()?;

        let password_hash = input.password.as_deref().map(hash_password).transpose()?;
        let rehashed = password_hash.is_some();
        let user = self
            .users
            .update(id, UserChanges { name: input.name, email: input.email, password_hash })
            .await?
            .ok_or_else(|| ServiceError::not_found("User"))?;
        info!(user_id = %user.id, rehashed, "user_updated");
        Ok(user.into())
    }

    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.users.delete(id).await? {
            return Err(ServiceError::not_found("User"));
        }
        info!(user_id = %id, "user_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::verify_password;
    use crate::users::repository::memory::InMemoryUserRepository;

    fn service() -> (UserService, Arc<InMemoryUserRepository>) {
        let repo = Arc::new(InMemoryUserRepository::new());
        (UserService::new(repo.clone(), ListConfig::default()), repo)
    }

    fn create_input(name: &str, email: &str) -> CreateUserInput {
        CreateUserInput {
            name: name.into(),
            email: email.into(),
            password: "Secret123!".into(),
            password_confirmation: None,
        }
    }

    #[tokio::test]
    async fn create_hashes_and_normalizes() {
        let (svc, repo) = service();
        let view = svc.create(create_input(" Jane ", "Jane@Example.com")).await.unwrap();
        assert_eq!(view.name, "Jane");
        assert_eq!(view.email, "jane@example.com");

        let stored = repo.find_by_id(view.id).await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "Secret123!");
        assert!(verify_password("Secret123!", &stored.password_hash));
    }

    #[tokio::test]
    async fn create_rejects_taken_email_case_insensitively() {
        let (svc, _) = service();
        svc.create(create_input("Jane", "jane@example.com")).await.unwrap();
        let err = svc.create(create_input("Other", "JANE@example.com")).await.unwrap_err();
        match err {
            ServiceError::Validation(f) => {
                assert_eq!(f.get("email"), Some(&["The email has already been taken.".to_string()][..]));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_keeps_hash_without_password_and_rehashes_with_one() {
        let (svc, repo) = service();
        let view = svc.create(create_input("Jane", "jane@example.com")).await.unwrap();
        let before = repo.find_by_id(view.id).await.unwrap().unwrap().password_hash;

        let input = UpdateUserInput { name: "Jane Roe".into(), email: "jane@example.com".into(), password: None, password_confirmation: None };
        let updated = svc.update(view.id, input).await.unwrap();
        assert_eq!(updated.name, "Jane Roe");
        assert_eq!(repo.find_by_id(view.id).await.unwrap().unwrap().password_hash, before);

        let input = UpdateUserInput {
            name: "Jane Roe".into(),
            email: "jane@example.com".into(),
            password: Some("Changed456?".into()),
            password_confirmation: Some("Changed456?".into()),
        };
        svc.update(view.id, input).await.unwrap();
        let after = repo.find_by_id(view.id).await.unwrap().unwrap().password_hash;
        assert_ne!(after, before);
        assert!(verify_password("Changed456?", &after));
    }

    #[tokio::test]
    async fn update_email_uniqueness_excludes_self() {
        let (svc, _) = service();
        let a = svc.create(create_input("A", "a@example.com")).await.unwrap();
        svc.create(create_input("B", "b@example.com")).await.unwrap();

        let clash = UpdateUserInput { name: "A".into(), email: "b@example.com".into(), password: None, password_confirmation: None };
        assert!(matches!(svc.update(a.id, clash).await, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let (svc, _) = service();
        let id = Uuid::new_v4();
        assert!(matches!(svc.get(id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.delete(id).await, Err(ServiceError::NotFound(_))));
        let input = UpdateUserInput::default();
        assert!(matches!(svc.update(id, input).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_removes_from_list_and_get() {
        let (svc, _) = service();
        let a = svc.create(create_input("A", "a@example.com")).await.unwrap();
        svc.create(create_input("B", "b@example.com")).await.unwrap();
        svc.delete(a.id).await.unwrap();
        assert!(svc.get(a.id).await.is_err());
        let page = svc.list(ListUsersQuery::default()).await.unwrap();
        assert_eq!(page.meta.total, 1);
        assert!(page.data.iter().all(|u| u.id != a.id));
    }

    #[tokio::test]
    async fn list_paginates_and_searches() {
        let (svc, _) = service();
        for i in 0..12 {
            svc.create(create_input(&format!("User {i}"), &format!("user{i}@example.com"))).await.unwrap();
        }
        svc.create(create_input("Zed Special", "zed@other.org")).await.unwrap();

        let first = svc.list(ListUsersQuery::default()).await.unwrap();
        assert_eq!(first.data.len(), 10);
        assert_eq!(first.meta.total, 13);
        assert_eq!(first.meta.last_page, 2);
        assert_eq!(first.data[0].name, "Zed Special");

        let blank = svc.list(ListUsersQuery { search: Some("   ".into()), ..Default::default() }).await.unwrap();
        assert_eq!(blank.meta.total, 13);

        let hits = svc.list(ListUsersQuery { search: Some("special".into()), ..Default::default() }).await.unwrap();
        assert_eq!(hits.meta.total, 1);

        let big = svc.list(ListUsersQuery { per_page: Some(5000), ..Default::default() }).await.unwrap();
        assert_eq!(big.meta.per_page, 100);
        assert_eq!(big.data.len(), 13);
    }
}
