//! Email verification token model.

use antrean_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from `email_verification_tokens`. One outstanding token per user.
#[derive(Debug, Clone, FromRow)]
pub struct EmailVerificationToken {
    pub id: DbId,
    pub user_id: DbId,
    pub token: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}
