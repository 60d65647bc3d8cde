//! User records: domain types, repository abstraction (SeaORM and in-memory)
//! and the `UserService` used by the management endpoints.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;

pub use domain::{ListUsersQuery, User, UserView};
pub use service::UserService;
