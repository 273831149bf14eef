//! Repository for the `email_verification_tokens` table.

use sqlx::PgPool;

use crate::models::email_verification::EmailVerificationToken;

const COLUMNS: &str = "id, user_id, token, expires_at, created_at";

pub struct EmailVerificationRepo;

impl EmailVerificationRepo {
    /// Find an unexpired verification token.
    pub async fn find_valid(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<EmailVerificationToken>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM email_verification_tokens
             WHERE token = $1 AND expires_at > NOW()"
        );
        sqlx::query_as::<_, EmailVerificationToken>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// Mark the token's user verified and consume the token, atomically.
    ///
    /// Returns `false` if the token was already consumed or has expired.
    pub async fn confirm(pool: &PgPool, token: &str) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let user_id: Option<i64> = sqlx::query_scalar(
            "DELETE FROM email_verification_tokens
             WHERE token = $1 AND expires_at > NOW()
             RETURNING user_id",
        )
        .bind(token)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(user_id) = user_id else {
            tx.rollback().await?;
            return Ok(false);
        };

        sqlx::query("UPDATE users SET is_verified = true WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }
}
