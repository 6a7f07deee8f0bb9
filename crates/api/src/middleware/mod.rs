//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the user behind a valid Bearer token.
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.
//! - [`rbac::RequireAuth`] -- any authenticated user.

pub mod auth;
pub mod rbac;
