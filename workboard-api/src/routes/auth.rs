/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration (always as employee)
/// - Login
/// - Token refresh
/// - Password change
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register new user
/// - `POST /v1/auth/login` - Login and get tokens
/// - `POST /v1/auth/refresh` - Refresh access token
/// - `PUT /v1/auth/password` - Change own password (authenticated)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;
use workboard_shared::{
    auth::{jwt, middleware::AuthContext, password},
    models::user::{CreateUser, User, UserRole},
};

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address, used as the user id
    #[validate(email(message = "Invalid email format"))]
    pub id: String,

    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,

    /// Password (checked against the password policy)
    pub password: String,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// User id
    pub user_id: String,

    /// Assigned role (always "employee" at registration)
    pub role: UserRole,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub id: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// User id
    pub user_id: String,

    /// Current role
    pub role: UserRole,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access_token: String,
}

/// Password change request
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    /// Current password, re-checked before the change
    pub current_password: String,

    /// New password (checked against the password policy)
    pub new_password: String,
}

/// Password change response
#[derive(Debug, Serialize)]
pub struct ChangePasswordResponse {
    /// Always true on success
    pub changed: bool,
}

/// Register a new user
///
/// Creates a new account. Self-registration always produces an employee;
/// roles are granted afterwards by an admin through the user administration
/// endpoints.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/register
/// Content-Type: application/json
///
/// {
///   "id": "user@example.com",
///   "name": "Jordan Doe",
///   "password": "Correct.Horse.Battery.1"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation or password policy failed
/// - `409 Conflict`: User id already exists
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    req.validate()?;

    password::password_meets_policy(&req.password)
        .map_err(|e| ApiError::invalid_field("password", e))?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            id: req.id,
            name: req.name,
            password_hash,
        },
    )
    .await?;

    // Generate tokens
    let access_claims = jwt::Claims::new(user.id.clone(), user.role, jwt::TokenType::Access);
    let refresh_claims = jwt::Claims::new(user.id.clone(), user.role, jwt::TokenType::Refresh);

    let access_token = jwt::create_token(&access_claims, state.jwt_secret())?;
    let refresh_token = jwt::create_token(&refresh_claims, state.jwt_secret())?;

    Ok(Json(RegisterResponse {
        user_id: user.id,
        role: user.role,
        access_token,
        refresh_token,
    }))
}

/// Login endpoint
///
/// Authenticates a user and returns JWT tokens carrying the current role.
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown user or wrong password (indistinguishable
///   on purpose)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let user = User::find_by_id(&state.db, &req.id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid user id or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid user id or password".to_string(),
        ));
    }

    User::update_last_login(&state.db, &user.id).await?;

    // Generate tokens
    let access_claims = jwt::Claims::new(user.id.clone(), user.role, jwt::TokenType::Access);
    let refresh_claims = jwt::Claims::new(user.id.clone(), user.role, jwt::TokenType::Refresh);

    let access_token = jwt::create_token(&access_claims, state.jwt_secret())?;
    let refresh_token = jwt::create_token(&refresh_claims, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        user_id: user.id,
        role: user.role,
        access_token,
        refresh_token,
    }))
}

/// Token refresh endpoint
///
/// Exchanges a refresh token for a new access token with the same subject
/// and role.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid or expired refresh token
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access_token }))
}

/// Password change endpoint
///
/// Verifies the caller's current password, then stores a hash of the new one.
///
/// # Errors
///
/// - `401 Unauthorized`: Current password is wrong
/// - `422 Unprocessable Entity`: New password fails the policy
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<ChangePasswordResponse>> {
    let user = User::find_by_id(&state.db, &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let valid = password::verify_password(&req.current_password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    password::password_meets_policy(&req.new_password)
        .map_err(|e| ApiError::invalid_field("new_password", e))?;

    let password_hash = password::hash_password(&req.new_password)?;
    let updated = User::update_password(&state.db, &user.id, &password_hash).await?;
    if !updated {
        return Err(ApiError::InternalError(
            "Password update affected no rows".to_string(),
        ));
    }

    Ok(Json(ChangePasswordResponse { changed: true }))
}
