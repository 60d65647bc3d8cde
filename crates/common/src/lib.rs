//! Shared helpers used by the server crates: response types, logging setup and
//! runtime environment checks.

pub mod types;
pub mod utils;
pub mod env;
