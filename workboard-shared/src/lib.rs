//! # Workboard Shared Library
//!
//! This crate contains shared types, database access, and business logic used
//! by the Workboard API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Authentication and authorization utilities
//! - `db`: Connection pool and migration runner
//! - `dashboard`: Pure read-side aggregation over a project's tasks

pub mod auth;
pub mod dashboard;
pub mod db;
pub mod models;

/// Current version of the Workboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
