use thiserror::Error;

use crate::errors::ServiceError;
use crate::validation::FieldErrors;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error("Provided email or password is incorrect")]
    InvalidCredentials,
    #[error("Unauthenticated.")]
    Unauthenticated,
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("token error: {0}")]
    TokenError(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::InvalidCredentials => 1004,
            AuthError::Unauthenticated => 1005,
            AuthError::HashError(_) => 1101,
            AuthError::TokenError(_) => 1102,
            AuthError::Repository(_) => 1200,
        }
    }
}

impl From<ServiceError> for AuthError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(fields) => AuthError::Validation(fields),
            ServiceError::Hash(msg) => AuthError::HashError(msg),
            other => AuthError::Repository(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(AuthError::InvalidCredentials.code(), 1004);
        assert_eq!(AuthError::Unauthenticated.code(), 1005);
        assert_eq!(AuthError::InvalidCredentials.to_string(), "Provided email or password is incorrect");
    }

    #[test]
    fn service_errors_convert() {
        let v: AuthError = ServiceError::Validation(FieldErrors::taken("email")).into();
        assert!(matches!(v, AuthError::Validation(_)));
        let h: AuthError = ServiceError::Hash("bad".into()).into();
        assert_eq!(h.code(), 1101);
        let r: AuthError = ServiceError::Db("down".into()).into();
        assert_eq!(r.code(), 1200);
    }
}
