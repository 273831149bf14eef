//! Repository for the `companies` table.

use antrean_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::Company;

const COLUMNS: &str =
    "id, user_id, company_name, industry, website, address, created_at, updated_at";

pub struct CompanyRepo;

impl CompanyRepo {
    /// Resolve a company-role caller's company by their user id.
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE user_id = $1");
        sqlx::query_as::<_, Company>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
