//! Repository for the `user_profiles` table.

use antrean_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::UserProfile;

const COLUMNS: &str = "id, user_id, full_name, phone, created_at, updated_at";

pub struct UserProfileRepo;

impl UserProfileRepo {
    /// Find the profile belonging to a `user`-role account.
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_profiles WHERE user_id = $1");
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
