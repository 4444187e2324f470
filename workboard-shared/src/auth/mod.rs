/// Authentication and authorization utilities
///
/// This module provides the security primitives for Workboard:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and the password policy
/// - [`jwt`]: JWT token generation and validation
/// - [`middleware`]: Request authentication context for axum handlers
/// - [`authorization`]: Role capability table and project access checks
///
/// # Example
///
/// ```no_run
/// use workboard_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
