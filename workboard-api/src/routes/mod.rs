/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh, password)
/// - `users`: User administration endpoints (admin only)
/// - `projects`: Project and membership endpoints
/// - `tasks`: Task lifecycle endpoints
/// - `dashboard`: Per-project dashboard endpoint

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod projects;
pub mod tasks;
pub mod users;
