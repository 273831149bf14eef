//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint on `users.role` in
//! `20260301000001_create_users.sql`.

use crate::error::CoreError;

/// An end user who joins queues.
pub const ROLE_USER: &str = "user";
/// A company operator who owns rooms and advances their queues.
pub const ROLE_COMPANY: &str = "company";

/// All roles accepted at registration.
pub const VALID_ROLES: &[&str] = &[ROLE_USER, ROLE_COMPANY];

/// Validate that a role string is one of the known roles.
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid role '{role}'. Must be one of: {VALID_ROLES:?}"
        )))
    }
}
