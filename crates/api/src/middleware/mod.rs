//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a Bearer token
//!   or the `access_token` cookie.
//! - [`rbac::RequireUser`] -- Requires the `user` role.
//! - [`rbac::RequireCompany`] -- Requires the `company` role.

pub mod auth;
pub mod rbac;
