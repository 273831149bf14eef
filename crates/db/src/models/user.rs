//! User, user profile, and company models and DTOs.

use antrean_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_verified: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub role: String,
    pub is_verified: bool,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role.clone(),
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}

/// Personal details of a `user`-role account, from `user_profiles`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserProfile {
    pub id: DbId,
    pub user_id: DbId,
    pub full_name: String,
    pub phone: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A company owned by a `company`-role account, from `companies`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Company {
    pub id: DbId,
    pub user_id: DbId,
    pub company_name: String,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Role-specific data created alongside a new account.
#[derive(Debug, Clone)]
pub enum AccountProfile {
    User {
        full_name: String,
        phone: Option<String>,
    },
    Company {
        company_name: String,
        industry: Option<String>,
        website: Option<String>,
        address: Option<String>,
    },
}

impl AccountProfile {
    /// The role name this profile belongs to.
    pub fn role(&self) -> &'static str {
        match self {
            AccountProfile::User { .. } => antrean_core::roles::ROLE_USER,
            AccountProfile::Company { .. } => antrean_core::roles::ROLE_COMPANY,
        }
    }
}

/// DTO for registering a new account with its profile and verification token.
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub email: String,
    pub password_hash: String,
    pub profile: AccountProfile,
    pub verification_token: String,
    pub verification_expires_at: Timestamp,
}
