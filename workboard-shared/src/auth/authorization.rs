/// Role-based authorization
///
/// Workboard uses a small capability table instead of scattering role
/// comparisons through the handlers. Each [`Capability`] names one privileged
/// action, and [`Capability::allowed_for`] is the single source of truth for
/// which roles hold it.
///
/// Project-scoped reads additionally require membership, checked by
/// [`require_project_access`]. Admins bypass the membership check.

use sqlx::PgPool;

use crate::models::membership::Membership;
use crate::models::user::UserRole;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// The caller's role does not hold the required capability
    #[error("Role '{role}' may not {capability}")]
    MissingCapability {
        role: &'static str,
        capability: &'static str,
    },

    /// The caller is not a member of the project
    #[error("Not a member of project '{0}'")]
    NotProjectMember(String),

    /// Database error during an access check
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Privileged actions gated by role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// List users and change their roles
    ManageUsers,

    /// Create new projects
    CreateProjects,

    /// Delete projects and everything under them
    RemoveProjects,

    /// Add members to a project
    AddMembers,

    /// Assign tasks to users other than oneself
    AssignOthers,

    /// See every task in a project, not just one's own
    ViewAllTasks,

    /// See every project, not just those one belongs to
    ViewAllProjects,
}

impl Capability {
    /// Human-readable action name, used in error messages
    pub fn describe(&self) -> &'static str {
        match self {
            Capability::ManageUsers => "manage users",
            Capability::CreateProjects => "create projects",
            Capability::RemoveProjects => "remove projects",
            Capability::AddMembers => "add project members",
            Capability::AssignOthers => "assign tasks to others",
            Capability::ViewAllTasks => "view all tasks",
            Capability::ViewAllProjects => "view all projects",
        }
    }

    /// The capability table
    ///
    /// Admins hold every capability. Project managers hold the project and
    /// task management capabilities but cannot manage users or remove
    /// projects. Employees hold none; their allowed actions (self-assign,
    /// start, complete) are ownership checks in the handlers, not
    /// capabilities.
    pub fn allowed_for(&self, role: UserRole) -> bool {
        match role {
            UserRole::Admin => true,
            UserRole::ProjectManager => matches!(
                self,
                Capability::CreateProjects
                    | Capability::AddMembers
                    | Capability::AssignOthers
                    | Capability::ViewAllTasks
            ),
            UserRole::Employee => false,
        }
    }
}

/// Checks that a role holds a capability
///
/// # Errors
///
/// Returns `AuthzError::MissingCapability` if it doesn't
pub fn require_capability(role: UserRole, capability: Capability) -> Result<(), AuthzError> {
    if capability.allowed_for(role) {
        Ok(())
    } else {
        Err(AuthzError::MissingCapability {
            role: role.as_str(),
            capability: capability.describe(),
        })
    }
}

/// Checks that a user may access a project
///
/// Admins may access any project. Everyone else must be a member.
///
/// # Errors
///
/// Returns `AuthzError::NotProjectMember` for non-members,
/// `AuthzError::DatabaseError` on query failure
pub async fn require_project_access(
    pool: &PgPool,
    project_id: &str,
    user_id: &str,
    role: UserRole,
) -> Result<(), AuthzError> {
    if role == UserRole::Admin {
        return Ok(());
    }

    if Membership::has_access(pool, project_id, user_id).await? {
        Ok(())
    } else {
        Err(AuthzError::NotProjectMember(project_id.to_string()))
    }
}
