/// Membership model and database operations
///
/// This module provides the Membership model for user-project relationships
/// (the `project_users` join table). A membership grants visibility of and
/// participation in a project; it carries no role of its own, since roles are
/// application-wide properties of the user.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE project_users (
///     project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (project_id, user_id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use workboard_shared::models::membership::Membership;
/// use workboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// // Add a user to a project (no-op if already a member)
/// Membership::create(&pool, "AB12C", "user@example.com").await?;
///
/// let has_access = Membership::has_access(&pool, "AB12C", "user@example.com").await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Membership model representing a user-project relationship
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    /// Project id
    pub project_id: String,

    /// User id
    pub user_id: String,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

/// Membership row joined with the member's display name
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MemberRecord {
    /// User id
    pub user_id: String,

    /// Display name
    pub name: String,

    /// Whether this member is the project's manager
    pub is_manager: bool,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

impl Membership {
    /// Adds a user to a project
    ///
    /// Idempotent: inserting an existing membership is a no-op. The composite
    /// primary key forbids duplicate rows.
    ///
    /// # Returns
    ///
    /// True if a new membership was created, false if it already existed
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The project or user doesn't exist (foreign key violation)
    /// - Database connection fails
    pub async fn create(
        pool: &PgPool,
        project_id: &str,
        user_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO project_users (project_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (project_id, user_id) DO NOTHING
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Checks if a user is a member of a project
    pub async fn has_access(
        pool: &PgPool,
        project_id: &str,
        user_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM project_users
                WHERE project_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Lists all members of a project with display names
    ///
    /// The manager is flagged so callers don't need a second query.
    pub async fn list_members(
        pool: &PgPool,
        project_id: &str,
    ) -> Result<Vec<MemberRecord>, sqlx::Error> {
        let members = sqlx::query_as::<_, MemberRecord>(
            r#"
            SELECT pu.user_id, u.name, (p.manager_id = pu.user_id) AS is_manager, pu.created_at
            FROM project_users pu
            JOIN users u ON u.id = pu.user_id
            JOIN projects p ON p.id = pu.project_id
            WHERE pu.project_id = $1
            ORDER BY pu.created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }
}
