/// Project model and database operations
///
/// This module provides the Project model. Projects are keyed by 5-character
/// codes (uppercase letters and digits, at least one letter) and reference
/// exactly one manager. Members are tracked by the Membership model.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id TEXT PRIMARY KEY CHECK (id ~ '^[A-Z0-9]{5}$'),
///     manager_id TEXT NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use workboard_shared::models::project::{CreateProject, Project};
/// use workboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let project = Project::create(&pool, CreateProject {
///     id: "AB12C".to_string(),
///     manager_id: "manager@example.com".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Validates a project id
///
/// A valid id is exactly 5 characters, each an uppercase ASCII letter or a
/// digit, with at least one letter.
///
/// # Example
///
/// ```
/// use workboard_shared::models::project::project_id_is_valid;
///
/// assert!(project_id_is_valid("AB12C"));
/// assert!(!project_id_is_valid("abcde")); // lowercase
/// assert!(!project_id_is_valid("AB1"));   // wrong length
/// assert!(!project_id_is_valid("AB12!")); // non-alphanumeric
/// assert!(!project_id_is_valid("12345")); // no letter
/// ```
pub fn project_id_is_valid(id: &str) -> bool {
    id.len() == 5
        && id
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        && id.chars().any(|c| c.is_ascii_uppercase())
}

/// Project model
///
/// The manager is stored as a structured reference (id column); display names
/// come from joining against the users table rather than packing
/// "name - id" strings into a single field.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// 5-character project code (primary key)
    pub id: String,

    /// User id of the project manager
    pub manager_id: String,

    /// When the project was created
    pub created_at: DateTime<Utc>,
}

/// Project row joined with the manager's display name
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectSummary {
    /// 5-character project code
    pub id: String,

    /// User id of the project manager
    pub manager_id: String,

    /// Display name of the project manager
    pub manager_name: String,

    /// When the project was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// 5-character project code
    pub id: String,

    /// User id of the project manager
    pub manager_id: String,
}

impl Project {
    /// Creates a new project together with the manager's implicit membership
    ///
    /// Both inserts run in one transaction so a project can never exist
    /// without its manager being a member.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The project id is already taken (unique constraint violation)
    /// - The manager doesn't exist (foreign key violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateProject) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (id, manager_id)
            VALUES ($1, $2)
            RETURNING id, manager_id, created_at
            "#,
        )
        .bind(&data.id)
        .bind(&data.manager_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO project_users (project_id, user_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(&data.id)
        .bind(&data.manager_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(project)
    }

    /// Finds a project by id
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, manager_id, created_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Lists all projects with their managers' display names
    ///
    /// Admin view: every project regardless of membership.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<ProjectSummary>, sqlx::Error> {
        let projects = sqlx::query_as::<_, ProjectSummary>(
            r#"
            SELECT p.id, p.manager_id, u.name AS manager_name, p.created_at
            FROM projects p
            JOIN users u ON u.id = p.manager_id
            ORDER BY p.created_at ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Lists projects a user belongs to, with managers' display names
    pub async fn list_by_member(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Vec<ProjectSummary>, sqlx::Error> {
        let projects = sqlx::query_as::<_, ProjectSummary>(
            r#"
            SELECT p.id, p.manager_id, u.name AS manager_name, p.created_at
            FROM projects p
            JOIN users u ON u.id = p.manager_id
            JOIN project_users pu ON pu.project_id = p.id
            WHERE pu.user_id = $1
            ORDER BY p.created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Deletes a project and everything under it
    ///
    /// Removes the project's tasks, memberships, and finally the project row
    /// in a single transaction. The cascade is all-or-nothing: either the
    /// project and all of its dependents disappear, or nothing changes.
    ///
    /// # Returns
    ///
    /// True if the project existed and was deleted, false otherwise
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM tasks WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM project_users WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}
