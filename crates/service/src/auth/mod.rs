//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Signup, login, logout and bearer-token resolution. Tokens are opaque random
//! strings; only their SHA-256 digest is persisted.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;
pub mod token;

pub use errors::AuthError;
pub use service::AuthService;
