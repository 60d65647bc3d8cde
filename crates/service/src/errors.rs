use thiserror::Error;

use models::errors::ModelError;

use crate::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(FieldErrors),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("hashing error: {0}")]
    Hash(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(ModelError),
}

impl ServiceError {
    /// `NotFound` whose message is shown to API clients as-is.
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found.", entity)) }
}

impl From<ModelError> for ServiceError {
    /// A unique-index hit is reported like the application-level check.
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Duplicate(field) => Self::Validation(FieldErrors::taken(field)),
            other => Self::Model(other),
        }
    }
}

impl From<FieldErrors> for ServiceError {
    fn from(errors: FieldErrors) -> Self { Self::Validation(errors) }
}
