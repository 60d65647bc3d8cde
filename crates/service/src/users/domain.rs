use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Stored user, including the password hash. Never serialised directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public projection returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(u: User) -> Self {
        Self { id: u.id, name: u.name, email: u.email, created_at: u.created_at, updated_at: u.updated_at }
    }
}

impl From<models::user::Model> for User {
    fn from(m: models::user::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            password_hash: m.password_hash,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

/// Insert payload; `email` already normalised, `password_hash` already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Update payload. `password_hash: None` keeps the stored hash.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
}

/// Query string of the listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListUsersQuery {
    pub search: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub per_page: Option<u32>,
}

/// Query values arrive as strings; anything unparsable falls back to the default.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse().ok()))
}

impl ListUsersQuery {
    /// Trimmed search term, `None` when blank.
    pub fn term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}
