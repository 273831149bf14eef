//! Repository for the `users` table.

use antrean_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{AccountProfile, CreateAccount, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, role, is_verified, created_at, updated_at";

/// Provides account lookups and registration.
pub struct UserRepo;

impl UserRepo {
    /// Create a user, its role-specific profile row, and its verification
    /// token in a single transaction.
    ///
    /// A taken email surfaces as a unique violation on `uq_users_email`.
    pub async fn register(pool: &PgPool, input: &CreateAccount) -> Result<User, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO users (email, password_hash, role)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&insert_query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.profile.role())
            .fetch_one(&mut *tx)
            .await?;

        match &input.profile {
            AccountProfile::User { full_name, phone } => {
                sqlx::query(
                    "INSERT INTO user_profiles (user_id, full_name, phone) VALUES ($1, $2, $3)",
                )
                .bind(user.id)
                .bind(full_name)
                .bind(phone)
                .execute(&mut *tx)
                .await?;
            }
            AccountProfile::Company {
                company_name,
                industry,
                website,
                address,
            } => {
                sqlx::query(
                    "INSERT INTO companies (user_id, company_name, industry, website, address)
                     VALUES ($1, $2, $3, $4, $5)",
                )
                .bind(user.id)
                .bind(company_name)
                .bind(industry)
                .bind(website)
                .bind(address)
                .execute(&mut *tx)
                .await?;
            }
        }

        sqlx::query(
            "INSERT INTO email_verification_tokens (user_id, token, expires_at)
             VALUES ($1, $2, $3)",
        )
        .bind(user.id)
        .bind(&input.verification_token)
        .bind(input.verification_expires_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(user)
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive; callers normalise to lowercase).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }
}
