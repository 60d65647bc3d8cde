//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access (repository traits with
//!   SeaORM and in-memory implementations).
//! - Owns request validation rules and password/token handling.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod pagination;
pub mod password;
pub mod validation;
pub mod users;
pub mod auth;
pub mod seed;
#[cfg(test)]
pub mod test_support;

pub use auth::AuthService;
pub use errors::ServiceError;
pub use users::UserService;
