//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and checks a [`Capability`] through
//! [`authorize`], rejecting other roles with 403 Forbidden.

use antrean_core::access::{authorize, Capability};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `user` role (a queue joiner).
///
/// ```ignore
/// async fn mine(RequireUser(user): RequireUser) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireUser(pub AuthUser);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        authorize(&user.role, Capability::ViewOwnTickets)?;
        Ok(RequireUser(user))
    }
}

/// Requires the `company` role (a room owner / queue operator).
pub struct RequireCompany(pub AuthUser);

impl FromRequestParts<AppState> for RequireCompany {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        authorize(&user.role, Capability::ManageRooms)?;
        Ok(RequireCompany(user))
    }
}
