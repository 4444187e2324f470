/// Project and membership endpoints
///
/// # Endpoints
///
/// - `POST /v1/projects` - Create project
/// - `GET /v1/projects` - List visible projects
/// - `DELETE /v1/projects/:id` - Remove project and everything under it
/// - `POST /v1/projects/:id/members` - Add a member
/// - `GET /v1/projects/:id/members` - List members

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
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
        membership::{MemberRecord, Membership},
        project::{project_id_is_valid, CreateProject, Project, ProjectSummary},
        user::{User, UserRole},
    },
};

/// Create project request
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    /// 5-character project code: uppercase letters and digits, at least one
    /// letter
    pub id: String,

    /// Manager's user id; defaults to the caller
    pub manager_id: Option<String>,
}

/// Create project response
#[derive(Debug, Serialize)]
pub struct CreateProjectResponse {
    pub id: String,
    pub manager_id: String,
    pub created_at: DateTime<Utc>,
}

/// List projects response
#[derive(Debug, Serialize)]
pub struct ListProjectsResponse {
    pub projects: Vec<ProjectSummary>,
}

/// Remove project response
#[derive(Debug, Serialize)]
pub struct RemoveProjectResponse {
    pub id: String,
    pub removed: bool,
}

/// Add member request
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    /// User id to add
    pub user_id: String,
}

/// Add member response
#[derive(Debug, Serialize)]
pub struct AddMemberResponse {
    pub project_id: String,
    pub user_id: String,

    /// False when the user was already a member
    pub added: bool,
}

/// List members response
#[derive(Debug, Serialize)]
pub struct ListMembersResponse {
    pub members: Vec<MemberRecord>,
}

/// Create a new project
///
/// The manager becomes a member in the same transaction. Project managers
/// can only create projects they manage themselves; admins can appoint any
/// project manager.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is an employee, or a project manager naming
///   someone else as manager
/// - `422 Unprocessable Entity`: Malformed project id
/// - `404 Not Found`: Named manager doesn't exist
/// - `409 Conflict`: Project id already taken
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<Json<CreateProjectResponse>> {
    require_capability(auth.role, Capability::CreateProjects)?;

    if !project_id_is_valid(&req.id) {
        return Err(ApiError::invalid_field(
            "id",
            "Project id must be exactly 5 characters: uppercase letters and digits, \
             with at least one letter",
        ));
    }

    let manager_id = req.manager_id.unwrap_or_else(|| auth.user_id.clone());

    if auth.role != UserRole::Admin && manager_id != auth.user_id {
        return Err(ApiError::Forbidden(
            "Project managers can only create projects they manage".to_string(),
        ));
    }

    let manager = User::find_by_id(&state.db, &manager_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Manager not found".to_string()))?;

    if manager.role == UserRole::Employee {
        return Err(ApiError::BadRequest(
            "Project manager must hold the project_manager or admin role".to_string(),
        ));
    }

    let project = Project::create(
        &state.db,
        CreateProject {
            id: req.id,
            manager_id,
        },
    )
    .await?;

    tracing::info!(
        project_id = %project.id,
        manager_id = %project.manager_id,
        created_by = %auth.user_id,
        "Project created"
    );

    Ok(Json(CreateProjectResponse {
        id: project.id,
        manager_id: project.manager_id,
        created_at: project.created_at,
    }))
}

/// List projects visible to the caller
///
/// Admins see every project; everyone else sees the projects they belong to.
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ListProjectsResponse>> {
    let projects = if Capability::ViewAllProjects.allowed_for(auth.role) {
        Project::list_all(&state.db).await?
    } else {
        Project::list_by_member(&state.db, &auth.user_id).await?
    };

    Ok(Json(ListProjectsResponse { projects }))
}

/// Remove a project
///
/// Deletes the project together with its memberships and tasks in one
/// transaction.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not an admin
/// - `404 Not Found`: No such project
pub async fn remove_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<RemoveProjectResponse>> {
    require_capability(auth.role, Capability::RemoveProjects)?;

    let removed = Project::delete(&state.db, &project_id).await?;
    if !removed {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    tracing::info!(project_id = %project_id, removed_by = %auth.user_id, "Project removed");

    Ok(Json(RemoveProjectResponse {
        id: project_id,
        removed: true,
    }))
}

/// Add a member to a project
///
/// Idempotent: adding an existing member succeeds with `added: false`.
///
/// # Errors
///
/// - `403 Forbidden`: Caller may not add members, or is not a member of this
///   project
/// - `404 Not Found`: No such project or user
pub async fn add_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<String>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<Json<AddMemberResponse>> {
    require_capability(auth.role, Capability::AddMembers)?;
    require_project_access(&state.db, &project_id, &auth.user_id, auth.role).await?;

    if Project::find_by_id(&state.db, &project_id).await?.is_none() {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }
    if User::find_by_id(&state.db, &req.user_id).await?.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let added = Membership::create(&state.db, &project_id, &req.user_id).await?;

    Ok(Json(AddMemberResponse {
        project_id,
        user_id: req.user_id,
        added,
    }))
}

/// List the members of a project
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not a member (and not an admin)
/// - `404 Not Found`: No such project
pub async fn list_members(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<ListMembersResponse>> {
    require_project_access(&state.db, &project_id, &auth.user_id, auth.role).await?;

    if Project::find_by_id(&state.db, &project_id).await?.is_none() {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    let members = Membership::list_members(&state.db, &project_id).await?;

    Ok(Json(ListMembersResponse { members }))
}
