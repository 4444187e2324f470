/// Request authentication context
///
/// This module provides the authentication context that the API's JWT
/// middleware injects into request extensions, giving every handler an
/// explicit per-request identity instead of ambient session state.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use workboard_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {} ({})", auth.user_id, auth.role.as_str())
/// }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};

use super::jwt::Claims;
use crate::models::user::UserRole;

/// Error type for credential extraction and validation
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No credentials were provided
    #[error("Missing credentials")]
    MissingCredentials,

    /// Credentials were provided in an unexpected format
    #[error("Invalid credential format: {0}")]
    InvalidFormat(String),

    /// Token failed validation
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Authentication context added to request extensions
///
/// Carries the authenticated identity and role for the duration of one
/// request. Handlers extract it with axum's `Extension` extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user id
    pub user_id: String,

    /// Application-wide role at token issue time
    pub role: UserRole,
}

impl AuthContext {
    /// Creates auth context from validated JWT claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub.clone(),
            role: claims.role,
        }
    }

    /// Checks whether this context belongs to the given user
    pub fn is_user(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// Extracts a Bearer token from request headers
///
/// # Errors
///
/// Returns `AuthError::MissingCredentials` when there is no Authorization
/// header, `AuthError::InvalidFormat` when it isn't a Bearer token
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{Claims, TokenType};
    use axum::http::HeaderValue;

    #[test]
    fn test_auth_context_from_claims() {
        let claims = Claims::new("user@example.com", UserRole::Admin, TokenType::Access);
        let auth = AuthContext::from_claims(&claims);

        assert_eq!(auth.user_id, "user@example.com");
        assert_eq!(auth.role, UserRole::Admin);
        assert!(auth.is_user("user@example.com"));
        assert!(!auth.is_user("other@example.com"));
    }

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );

        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let headers = HeaderMap::new();
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );

        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::InvalidFormat(_))
        ));
    }
}
