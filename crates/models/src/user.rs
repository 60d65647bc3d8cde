use sea_orm::{entity::prelude::*, Set, DatabaseConnection, QueryFilter, IntoActiveModel};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::personal_access_token;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Tokens,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Tokens => Entity::has_many(personal_access_token::Entity).into() }
    }
}

impl Related<personal_access_token::Entity> for Entity {
    fn to() -> RelationDef { Relation::Tokens.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() { return Err(ModelError::Validation("name required".into())); }
    Ok(())
}

/// Insert a user. `email` must already be normalised; the unique index on
/// `users.email` surfaces as [`ModelError::Duplicate`].
pub async fn create(db: &DatabaseConnection, name: &str, email: &str, password_hash: &str) -> Result<Model, ModelError> {
    validate_email(email)?;
    validate_name(name)?;
    if password_hash.trim().is_empty() {
        return Err(ModelError::Validation("password hash required".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::from_db(e, "email"))
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, ModelError> {
    Entity::find()
        .filter(Column::Email.eq(email))
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

/// Overwrite name and email, and the hash when `password_hash` is given.
/// Returns `None` when no row has this id.
pub async fn update(
    db: &DatabaseConnection,
    id: Uuid,
    name: &str,
    email: &str,
    password_hash: Option<&str>,
) -> Result<Option<Model>, ModelError> {
    validate_email(email)?;
    validate_name(name)?;
    let Some(existing) = Entity::find_by_id(id).one(db).await.map_err(|e| ModelError::Db(e.to_string()))? else {
        return Ok(None);
    };
    let mut am = existing.into_active_model();
    am.name = Set(name.to_string());
    am.email = Set(email.to_string());
    if let Some(hash) = password_hash {
        am.password_hash = Set(hash.to_string());
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ModelError::from_db(e, "email"))?;
    Ok(Some(updated))
}

/// Remove the record; returns whether a row existed.
pub async fn hard_delete(db: &DatabaseConnection, id: Uuid) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await.map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}
