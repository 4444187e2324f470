/// Database models for Workboard
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts with application-wide roles
/// - `project`: Projects keyed by 5-character codes, each with one manager
/// - `membership`: User-project relationships (the `project_users` table)
/// - `task`: Tasks scoped to a project with assignment and timing fields
///
/// # Example
///
/// ```no_run
/// use workboard_shared::models::user::{CreateUser, User};
/// use workboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     id: "user@example.com".to_string(),
///     name: "Jane Doe".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod membership;
pub mod project;
pub mod task;
pub mod user;
