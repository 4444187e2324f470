/// Task lifecycle endpoints
///
/// Tasks move through a one-way state machine: not_started → in_progress →
/// completed, with a shortcut from not_started straight to completed for
/// tasks that are closed out without being worked on.
///
/// # Endpoints
///
/// - `POST /v1/projects/:id/tasks` - Create task
/// - `GET /v1/projects/:id/tasks` - List tasks (`?status=`, `?unassigned=`)
/// - `POST /v1/projects/:id/tasks/:task_id/assign` - Assign task
/// - `POST /v1/projects/:id/tasks/:task_id/start` - Start task
/// - `POST /v1/projects/:id/tasks/:task_id/complete` - Complete task

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use workboard_shared::{
    auth::{
        authorization::{require_capability, require_project_access, Capability},
        middleware::AuthContext,
    },
    models::{
        membership::Membership,
        project::Project,
        task::{CreateTask, Task, TaskStatus},
    },
};

/// Create task request
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    /// Task id, unique within the project
    pub task_id: String,

    /// When the task is due
    pub due_at: DateTime<Utc>,
}

/// Query parameters for listing tasks
#[derive(Debug, Default, Deserialize)]
pub struct ListTasksQuery {
    /// Only return tasks with this status
    pub status: Option<TaskStatus>,

    /// Only return unassigned tasks
    #[serde(default)]
    pub unassigned: bool,
}

/// List tasks response
#[derive(Debug, Serialize)]
pub struct ListTasksResponse {
    pub tasks: Vec<Task>,
}

/// Assign task request
///
/// Unknown fields are rejected rather than ignored: assignment never sets a
/// status, and a request trying to smuggle one in should fail loudly.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssignTaskRequest {
    /// What the task is about; written at assignment time
    pub description: String,

    /// Member the task goes to
    pub assignee: String,
}

/// Create a new task
///
/// Tasks are created unassigned and not started; description and assignee
/// are set later by the assign endpoint.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not a member of the project
/// - `404 Not Found`: No such project
/// - `409 Conflict`: Task id already exists in this project
/// - `422 Unprocessable Entity`: Blank task id
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<String>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    require_project_access(&state.db, &project_id, &auth.user_id, auth.role).await?;

    if req.task_id.trim().is_empty() {
        return Err(ApiError::invalid_field("task_id", "Task id must not be blank"));
    }

    if Project::find_by_id(&state.db, &project_id).await?.is_none() {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    let task = Task::create(
        &state.db,
        CreateTask {
            project_id,
            task_id: req.task_id,
            due_at: req.due_at,
        },
    )
    .await?;

    Ok(Json(task))
}

/// List tasks in a project
///
/// Members with the view-all capability (admins and project managers) see
/// every task; employees see only their own. Any member may list unassigned
/// tasks, since those are the pool they pick new work from.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not a member of the project
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<String>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<ListTasksResponse>> {
    require_project_access(&state.db, &project_id, &auth.user_id, auth.role).await?;

    let tasks = if query.unassigned {
        Task::list_unassigned(&state.db, &project_id).await?
    } else if Capability::ViewAllTasks.allowed_for(auth.role) {
        match query.status {
            Some(status) => Task::list_by_status(&state.db, &project_id, status).await?,
            None => Task::list_by_project(&state.db, &project_id).await?,
        }
    } else {
        Task::list_by_assignee(&state.db, &project_id, &auth.user_id, query.status).await?
    };

    Ok(Json(ListTasksResponse { tasks }))
}

/// Assign a task
///
/// Only unassigned tasks can be assigned; there is no reassignment.
/// Employees may only pick up tasks for themselves; project managers and
/// admins can hand tasks to any member.
///
/// # Errors
///
/// - `403 Forbidden`: Not a member, or an employee assigning to someone else
/// - `404 Not Found`: No such task
/// - `400 Bad Request`: Assignee is not a member of the project
/// - `409 Conflict`: Task is already assigned
pub async fn assign_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((project_id, task_id)): Path<(String, String)>,
    Json(req): Json<AssignTaskRequest>,
) -> ApiResult<Json<Task>> {
    require_project_access(&state.db, &project_id, &auth.user_id, auth.role).await?;

    if req.assignee != auth.user_id {
        require_capability(auth.role, Capability::AssignOthers)?;
    }

    if !Membership::has_access(&state.db, &project_id, &req.assignee).await? {
        return Err(ApiError::BadRequest(
            "Assignee is not a member of this project".to_string(),
        ));
    }

    let existing = Task::find(&state.db, &project_id, &task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if !existing.is_unassigned() {
        return Err(ApiError::Conflict("Task is already assigned".to_string()));
    }

    let task = Task::assign(&state.db, &project_id, &task_id, &req.description, &req.assignee)
        .await?
        // Lost a race with a concurrent assignment
        .ok_or_else(|| ApiError::Conflict("Task is already assigned".to_string()))?;

    tracing::info!(
        project_id = %project_id,
        task_id = %task_id,
        assignee = %task.assignee,
        assigned_by = %auth.user_id,
        "Task assigned"
    );

    Ok(Json(task))
}

/// Start a task
///
/// Records the start time and moves the task to in_progress. Only the
/// assignee can start their task, and only once.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not the assignee
/// - `404 Not Found`: No such task
/// - `409 Conflict`: Task was already started or is completed
pub async fn start_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((project_id, task_id)): Path<(String, String)>,
) -> ApiResult<Json<Task>> {
    require_project_access(&state.db, &project_id, &auth.user_id, auth.role).await?;

    let existing = Task::find(&state.db, &project_id, &task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if existing.assignee != auth.user_id {
        return Err(ApiError::Forbidden(
            "Only the assignee can start a task".to_string(),
        ));
    }

    if existing.status.is_terminal() {
        return Err(ApiError::Conflict("Task is already completed".to_string()));
    }

    let task = Task::start(&state.db, &project_id, &task_id)
        .await?
        .ok_or_else(|| ApiError::Conflict("Task was already started".to_string()))?;

    Ok(Json(task))
}

/// Complete a task
///
/// Records the end time and, if the task was started, the elapsed duration.
/// A never-started task can be completed directly; its elapsed duration
/// stays null. Only the assignee can complete their task.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not the assignee
/// - `404 Not Found`: No such task
/// - `409 Conflict`: Task is already completed
pub async fn complete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((project_id, task_id)): Path<(String, String)>,
) -> ApiResult<Json<Task>> {
    require_project_access(&state.db, &project_id, &auth.user_id, auth.role).await?;

    let existing = Task::find(&state.db, &project_id, &task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if existing.assignee != auth.user_id {
        return Err(ApiError::Forbidden(
            "Only the assignee can complete a task".to_string(),
        ));
    }

    let task = Task::complete(&state.db, &project_id, &task_id)
        .await?
        .ok_or_else(|| ApiError::Conflict("Task is already completed".to_string()))?;

    tracing::info!(
        project_id = %project_id,
        task_id = %task_id,
        time_spent_seconds = ?task.time_spent_seconds,
        "Task completed"
    );

    Ok(Json(task))
}
