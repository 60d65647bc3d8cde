use sea_orm::DatabaseConnection;
use uuid::Uuid;

use models::personal_access_token as pat;

use crate::auth::domain::AccessToken;
use crate::auth::errors::AuthError;
use crate::auth::repository::TokenRepository;

pub struct SeaOrmTokenRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmTokenRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn repo_err(e: models::errors::ModelError) -> AuthError { AuthError::Repository(e.to_string()) }

#[async_trait::async_trait]
impl TokenRepository for SeaOrmTokenRepository {
    async fn create(&self, user_id: Uuid, name: &str, token_hash: String) -> Result<AccessToken, AuthError> {
        let created = pat::create(&self.db, user_id, name, token_hash)
            .await
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        Ok(created.into())
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<AccessToken>, AuthError> {
        let res = pat::find_by_hash(&self.db, token_hash).await.map_err(repo_err)?;
        Ok(res.map(AccessToken::from))
    }

    async fn touch(&self, id: Uuid) -> Result<(), AuthError> {
        pat::touch(&self.db, id).await.map_err(repo_err)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AuthError> {
        pat::delete(&self.db, id).await.map_err(repo_err)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::service::{AuthConfig, AuthService};
    use crate::auth::AuthError;
    use crate::test_support::get_db;
    use crate::users::repo::seaorm::SeaOrmUserRepository;
    use crate::validation::{LoginInput, SignupInput};

    #[tokio::test]
    async fn auth_flow_against_postgres() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let svc = AuthService::new(
            Arc::new(SeaOrmUserRepository::new(db.clone())),
            Arc::new(SeaOrmTokenRepository::new(db.clone())),
            AuthConfig::default(),
        );
        let email = format!("auth_{}@example.com", Uuid::new_v4().simple());
        let session = svc
            .signup(SignupInput {
                name: "Pg User".into(),
                email: email.clone(),
                password: "Secret123!".into(),
                password_confirmation: "Secret123!".into(),
            })
            .await?;

        let login = svc.login(LoginInput { email: email.clone(), password: "Secret123!".into(), remember: Some(true) }).await?;
        assert_ne!(login.token, session.token);

        let ctx = svc.current_user(&login.token).await?;
        assert_eq!(ctx.user.id, session.user.id);

        svc.logout(&login.token).await?;
        assert!(matches!(svc.current_user(&login.token).await, Err(AuthError::Unauthenticated)));
        // the signup token is still valid
        assert!(svc.current_user(&session.token).await.is_ok());

        models::user::hard_delete(&db, session.user.id).await?;
        assert!(matches!(svc.current_user(&session.token).await, Err(AuthError::Unauthenticated)));
        Ok(())
    }
}
