use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::users::UserView;

/// Stored token row (digest only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub token_hash: String,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<models::personal_access_token::Model> for AccessToken {
    fn from(m: models::personal_access_token::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            name: m.name,
            token_hash: m.token_hash,
            last_used_at: m.last_used_at.map(|t| t.with_timezone(&Utc)),
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

/// Login/signup result: the user projection plus the plaintext token,
/// which is only ever available here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: UserView,
    pub token: String,
}

/// Resolved bearer token.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: UserView,
    pub token_id: Uuid,
}
