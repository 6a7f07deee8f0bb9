//! Well-known role name constants.
//!
//! These must match the `ck_users_role` check constraint in
//! `20250101000001_create_users.sql`.

use crate::error::CoreError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_ANALYST: &str = "analyst";
pub const ROLE_VIEWER: &str = "viewer";

/// Role assigned when a user is created without an explicit role.
pub const DEFAULT_ROLE: &str = ROLE_VIEWER;

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_ANALYST, ROLE_VIEWER];

/// Validate that a role name is one of [`VALID_ROLES`].
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown role: '{role}'. Valid roles: {}",
            VALID_ROLES.join(", ")
        )))
    }
}
