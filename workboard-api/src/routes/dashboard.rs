/// Project dashboard endpoint
///
/// # Endpoint
///
/// - `GET /v1/projects/:id/dashboard` - Aggregated view of a project's tasks

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use workboard_shared::{
    auth::{authorization::require_project_access, middleware::AuthContext},
    dashboard::{self, ProjectDashboard},
    models::{project::Project, task::Task},
};

/// Dashboard handler
///
/// Loads the project's tasks and aggregates them at the current instant:
/// status counts, completion percentage, overdue and due-soon figures, the
/// last week's completion trend, and per-assignee load.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not a member (and not an admin)
/// - `404 Not Found`: No such project
pub async fn project_dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<ProjectDashboard>> {
    require_project_access(&state.db, &project_id, &auth.user_id, auth.role).await?;

    if Project::find_by_id(&state.db, &project_id).await?.is_none() {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    let tasks = Task::list_by_project(&state.db, &project_id).await?;

    Ok(Json(dashboard::project_dashboard(&tasks, Utc::now())))
}
