/// Task model and database operations
///
/// This module provides the Task model. Tasks are scoped to a project and
/// keyed by `(project_id, task_id)`; the same task id can exist in different
/// projects.
///
/// # State Machine
///
/// ```text
/// not_started → in_progress → completed
/// not_started → completed          (a never-started task can be closed out)
/// ```
///
/// Transitions are monotonic; a completed task is never updated again.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('not_started', 'in_progress', 'completed');
///
/// CREATE TABLE tasks (
///     project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     task_id TEXT NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     assignee TEXT NOT NULL DEFAULT '',
///     status task_status NOT NULL DEFAULT 'not_started',
///     started_at TIMESTAMPTZ,
///     ended_at TIMESTAMPTZ,
///     time_spent_seconds DOUBLE PRECISION,
///     due_at TIMESTAMPTZ NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (project_id, task_id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use workboard_shared::models::task::{CreateTask, Task};
/// use workboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use chrono::{Duration, Utc};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     project_id: "AB12C".to_string(),
///     task_id: "T1".to_string(),
///     due_at: Utc::now() + Duration::hours(4),
/// }).await?;
///
/// Task::assign(&pool, "AB12C", "T1", "Write the report", "user@example.com").await?;
/// Task::start(&pool, "AB12C", "T1").await?;
/// Task::complete(&pool, "AB12C", "T1").await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task exists but work hasn't begun
    NotStarted,

    /// Work is underway
    InProgress,

    /// Task is finished; terminal
    Completed,
}

impl TaskStatus {
    /// Converts status to string for database storage and display
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "not_started",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Checks if status is terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }

    /// Checks if transition to target status is valid
    ///
    /// Completion is reachable from any non-terminal status; starting is only
    /// possible from not_started. Nothing leaves completed.
    pub fn can_transition_to(&self, target: TaskStatus) -> bool {
        match (self, target) {
            (TaskStatus::NotStarted, TaskStatus::InProgress) => true,
            (TaskStatus::NotStarted, TaskStatus::Completed) => true,
            (TaskStatus::InProgress, TaskStatus::Completed) => true,
            _ => false,
        }
    }
}

/// Task model
///
/// An empty `assignee` string marks the task as unassigned; the timing fields
/// are genuinely nullable. `time_spent_seconds` is only set when the task was
/// started before being completed, and then equals `ended_at - started_at`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Project this task belongs to
    pub project_id: String,

    /// Task id, unique within the project (not globally)
    pub task_id: String,

    /// Free-text description, set on assignment
    pub description: String,

    /// Assigned user id; empty string while unassigned
    pub assignee: String,

    /// Current status
    pub status: TaskStatus,

    /// When work started (null until started)
    pub started_at: Option<DateTime<Utc>>,

    /// When work finished (null until completed)
    pub ended_at: Option<DateTime<Utc>>,

    /// Elapsed seconds between start and completion (null if never started)
    pub time_spent_seconds: Option<f64>,

    /// Deadline
    pub due_at: DateTime<Utc>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Checks whether the task is still unassigned
    pub fn is_unassigned(&self) -> bool {
        self.assignee.is_empty()
    }
}

/// Input for creating a new task
///
/// Tasks are created unassigned with an empty description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Project id
    pub project_id: String,

    /// Task id (unique within the project)
    pub task_id: String,

    /// Deadline
    pub due_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in not_started state
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `(project_id, task_id)` already exists (unique constraint violation)
    /// - The project doesn't exist (foreign key violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (project_id, task_id, due_at)
            VALUES ($1, $2, $3)
            RETURNING project_id, task_id, description, assignee, status,
                      started_at, ended_at, time_spent_seconds, due_at,
                      created_at, updated_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.task_id)
        .bind(data.due_at)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by project and task id
    pub async fn find(
        pool: &PgPool,
        project_id: &str,
        task_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT project_id, task_id, description, assignee, status,
                   started_at, ended_at, time_spent_seconds, due_at,
                   created_at, updated_at
            FROM tasks
            WHERE project_id = $1 AND task_id = $2
            "#,
        )
        .bind(project_id)
        .bind(task_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Assigns an unassigned task
    ///
    /// Sets the description and assignee. Only applies while the assignee is
    /// still empty; the guard in the WHERE clause makes a concurrent double
    /// assignment impossible.
    ///
    /// # Returns
    ///
    /// The updated task, or None when the task doesn't exist or is already
    /// assigned (callers distinguish the two with a prior `find`)
    pub async fn assign(
        pool: &PgPool,
        project_id: &str,
        task_id: &str,
        description: &str,
        assignee: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET description = $3,
                assignee = $4,
                updated_at = NOW()
            WHERE project_id = $1 AND task_id = $2 AND assignee = ''
            RETURNING project_id, task_id, description, assignee, status,
                      started_at, ended_at, time_spent_seconds, due_at,
                      created_at, updated_at
            "#,
        )
        .bind(project_id)
        .bind(task_id)
        .bind(description)
        .bind(assignee)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Starts a task
    ///
    /// Sets status to in_progress and records the start time. Valid only
    /// while the task isn't completed and has no start time yet.
    ///
    /// # Returns
    ///
    /// The updated task, or None when the task doesn't exist, was already
    /// started, or is completed
    pub async fn start(
        pool: &PgPool,
        project_id: &str,
        task_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = 'in_progress',
                started_at = NOW(),
                updated_at = NOW()
            WHERE project_id = $1 AND task_id = $2
              AND status <> 'completed'
              AND started_at IS NULL
            RETURNING project_id, task_id, description, assignee, status,
                      started_at, ended_at, time_spent_seconds, due_at,
                      created_at, updated_at
            "#,
        )
        .bind(project_id)
        .bind(task_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Completes a task
    ///
    /// Records the end time and, when the task was started, the elapsed
    /// duration. A never-started task can be completed directly; its elapsed
    /// duration stays null. Completion is reachable from any non-terminal
    /// status.
    ///
    /// # Returns
    ///
    /// The updated task, or None when the task doesn't exist or is already
    /// completed
    pub async fn complete(
        pool: &PgPool,
        project_id: &str,
        task_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = 'completed',
                ended_at = NOW(),
                time_spent_seconds = CASE
                    WHEN started_at IS NOT NULL
                    THEN EXTRACT(EPOCH FROM (NOW() - started_at))::DOUBLE PRECISION
                    ELSE NULL
                END,
                updated_at = NOW()
            WHERE project_id = $1 AND task_id = $2
              AND status <> 'completed'
            RETURNING project_id, task_id, description, assignee, status,
                      started_at, ended_at, time_spent_seconds, due_at,
                      created_at, updated_at
            "#,
        )
        .bind(project_id)
        .bind(task_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks in a project
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT project_id, task_id, description, assignee, status,
                   started_at, ended_at, time_spent_seconds, due_at,
                   created_at, updated_at
            FROM tasks
            WHERE project_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists tasks in a project filtered by status
    pub async fn list_by_status(
        pool: &PgPool,
        project_id: &str,
        status: TaskStatus,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT project_id, task_id, description, assignee, status,
                   started_at, ended_at, time_spent_seconds, due_at,
                   created_at, updated_at
            FROM tasks
            WHERE project_id = $1 AND status = $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(project_id)
        .bind(status)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists tasks in a project assigned to a specific user
    ///
    /// Pass a status to narrow further; employees only ever see their own
    /// tasks through this query.
    pub async fn list_by_assignee(
        pool: &PgPool,
        project_id: &str,
        assignee: &str,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = match status {
            Some(status) => {
                sqlx::query_as::<_, Task>(
                    r#"
                    SELECT project_id, task_id, description, assignee, status,
                           started_at, ended_at, time_spent_seconds, due_at,
                           created_at, updated_at
                    FROM tasks
                    WHERE project_id = $1 AND assignee = $2 AND status = $3
                    ORDER BY created_at ASC
                    "#,
                )
                .bind(project_id)
                .bind(assignee)
                .bind(status)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Task>(
                    r#"
                    SELECT project_id, task_id, description, assignee, status,
                           started_at, ended_at, time_spent_seconds, due_at,
                           created_at, updated_at
                    FROM tasks
                    WHERE project_id = $1 AND assignee = $2
                    ORDER BY created_at ASC
                    "#,
                )
                .bind(project_id)
                .bind(assignee)
                .fetch_all(pool)
                .await?
            }
        };

        Ok(tasks)
    }

    /// Lists unassigned tasks in a project
    pub async fn list_unassigned(
        pool: &PgPool,
        project_id: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT project_id, task_id, description, assignee, status,
                   started_at, ended_at, time_spent_seconds, due_at,
                   created_at, updated_at
            FROM tasks
            WHERE project_id = $1 AND assignee = ''
            ORDER BY due_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_as_str() {
        assert_eq!(TaskStatus::NotStarted.as_str(), "not_started");
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
        assert_eq!(TaskStatus::Completed.as_str(), "completed");
    }

    #[test]
    fn test_task_status_is_terminal() {
        assert!(!TaskStatus::NotStarted.is_terminal());
        assert!(!TaskStatus::InProgress.is_terminal());
        assert!(TaskStatus::Completed.is_terminal());
    }

    #[test]
    fn test_task_status_transitions() {
        // Forward transitions
        assert!(TaskStatus::NotStarted.can_transition_to(TaskStatus::InProgress));
        assert!(TaskStatus::InProgress.can_transition_to(TaskStatus::Completed));

        // Completion without starting is allowed
        assert!(TaskStatus::NotStarted.can_transition_to(TaskStatus::Completed));

        // No reversals
        assert!(!TaskStatus::InProgress.can_transition_to(TaskStatus::NotStarted));
        assert!(!TaskStatus::Completed.can_transition_to(TaskStatus::InProgress));
        assert!(!TaskStatus::Completed.can_transition_to(TaskStatus::NotStarted));

        // No self transitions
        assert!(!TaskStatus::NotStarted.can_transition_to(TaskStatus::NotStarted));
        assert!(!TaskStatus::Completed.can_transition_to(TaskStatus::Completed));
    }

    #[test]
    fn test_is_unassigned() {
        let mut task = sample_task();
        assert!(task.is_unassigned());

        task.assignee = "user@example.com".to_string();
        assert!(!task.is_unassigned());
    }

    fn sample_task() -> Task {
        let now = Utc::now();
        Task {
            project_id: "AB12C".to_string(),
            task_id: "T1".to_string(),
            description: String::new(),
            assignee: String::new(),
            status: TaskStatus::NotStarted,
            started_at: None,
            ended_at: None,
            time_spent_seconds: None,
            due_at: now,
            created_at: now,
            updated_at: now,
        }
    }
}
