/// User administration endpoints
///
/// Admin-only views over the user table, plus role changes.
///
/// # Endpoints
///
/// - `GET /v1/users` - List users, optionally filtered by role
/// - `PUT /v1/users/:id/role` - Change a user's role

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
        authorization::{require_capability, Capability},
        middleware::AuthContext,
    },
    models::user::{User, UserRole},
};

/// Query parameters for listing users
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    /// Only return users with this role
    pub role: Option<UserRole>,
}

/// User as exposed by the API; never includes the password hash
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            role: user.role,
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}

/// List users response
#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserView>,
}

/// Role change request
#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    /// New role for the user
    pub role: UserRole,
}

/// Role change response
#[derive(Debug, Serialize)]
pub struct SetRoleResponse {
    /// User id
    pub user_id: String,

    /// Role after the call
    pub role: UserRole,

    /// False when the user already held the role
    pub changed: bool,
}

/// List users, optionally filtered by role
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not an admin
pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Json<ListUsersResponse>> {
    require_capability(auth.role, Capability::ManageUsers)?;

    let users = match query.role {
        Some(role) => User::list_by_role(&state.db, role).await?,
        None => User::list(&state.db).await?,
    };

    Ok(Json(ListUsersResponse {
        users: users.into_iter().map(UserView::from).collect(),
    }))
}

/// Change a user's role
///
/// Idempotent: setting a role the user already holds succeeds with
/// `changed: false` instead of failing. The new role takes effect in tokens
/// the next time the user logs in or refreshes.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not an admin
/// - `404 Not Found`: No such user
pub async fn set_role(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(user_id): Path<String>,
    Json(req): Json<SetRoleRequest>,
) -> ApiResult<Json<SetRoleResponse>> {
    require_capability(auth.role, Capability::ManageUsers)?;

    let user = User::find_by_id(&state.db, &user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if user.role == req.role {
        return Ok(Json(SetRoleResponse {
            user_id: user.id,
            role: user.role,
            changed: false,
        }));
    }

    let updated = User::update_role(&state.db, &user_id, req.role)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!(
        user_id = %updated.id,
        role = updated.role.as_str(),
        changed_by = %auth.user_id,
        "User role changed"
    );

    Ok(Json(SetRoleResponse {
        user_id: updated.id,
        role: updated.role,
        changed: true,
    }))
}
