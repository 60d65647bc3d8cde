use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use models::user;

use crate::errors::ServiceError;
use crate::pagination::Pagination;
use crate::users::domain::{NewUser, User, UserChanges};
use crate::users::repository::UserRepository;

pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn db_err(e: sea_orm::DbErr) -> ServiceError { ServiceError::Db(e.to_string()) }

/// Escape `\`, `%` and `_` so the term matches literally inside `LIKE`.
pub(crate) fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Case-insensitive substring match on name or email.
fn search_condition(term: &str) -> Condition {
    let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
    Condition::any()
        .add(Expr::expr(Func::lower(Expr::col(user::Column::Name))).like(LikeExpr::new(pattern.clone()).escape('\\')))
        .add(Expr::expr(Func::lower(Expr::col(user::Column::Email))).like(LikeExpr::new(pattern).escape('\\')))
}

#[async_trait::async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn insert(&self, u: NewUser) -> Result<User, ServiceError> {
        let created = user::create(&self.db, &u.name, &u.email, &u.password_hash).await?;
        Ok(created.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ServiceError> {
        let res = user::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)?;
        Ok(res.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        Ok(user::find_by_email(&self.db, email).await?.map(User::from))
    }

    async fn email_taken(&self, email: &str, except: Option<Uuid>) -> Result<bool, ServiceError> {
        let mut q = user::Entity::find().filter(user::Column::Email.eq(email));
        if let Some(id) = except {
            q = q.filter(user::Column::Id.ne(id));
        }
        Ok(q.count(&self.db).await.map_err(db_err)? > 0)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, ServiceError> {
        let updated = user::update(&self.db, id, &changes.name, &changes.email, changes.password_hash.as_deref()).await?;
        Ok(updated.map(User::from))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(user::hard_delete(&self.db, id).await?)
    }

    async fn list(&self, search: Option<&str>, page: Pagination, max_per_page: u32) -> Result<(Vec<User>, u64), ServiceError> {
        let (idx, per_page) = page.normalize_with(max_per_page);
        let mut q = user::Entity::find();
        if let Some(term) = search {
            q = q.filter(search_condition(term));
        }
        let paginator = q
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id)
            .paginate(&self.db, per_page);
        let total = paginator.num_items().await.map_err(db_err)?;
        let rows = paginator.fetch_page(idx).await.map_err(db_err)?;
        Ok((rows.into_iter().map(User::from).collect(), total))
    }

    async fn count(&self) -> Result<u64, ServiceError> {
        user::Entity::find().count(&self.db).await.map_err(db_err)
    }
}
