use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("duplicate value for {0}")]
    Duplicate(&'static str),
    #[error("database error: {0}")]
    Db(String),
}

impl ModelError {
    /// Map a SeaORM error, recognising unique-index violations on `field`.
    pub fn from_db(err: sea_orm::DbErr, field: &'static str) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => Self::Duplicate(field),
            _ => Self::Db(err.to_string()),
        }
    }
}
