//! Repository for the `rooms` table.

use antrean_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::room::{CreateRoom, Room, RoomWithFields, UpdateRoom};
use crate::repositories::FormFieldRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, company_id, name, description, secret_key, is_active, created_at, updated_at";

/// Provides CRUD operations for rooms and their form definitions.
pub struct RoomRepo;

impl RoomRepo {
    /// Insert a room and its fields in one transaction.
    ///
    /// A secret key collision surfaces as a unique violation on
    /// `uq_rooms_secret_key`; callers generate a fresh key and retry.
    pub async fn create_with_fields(
        pool: &PgPool,
        company_id: DbId,
        secret_key: &str,
        input: &CreateRoom,
    ) -> Result<RoomWithFields, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO rooms (company_id, name, description, secret_key)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let room = sqlx::query_as::<_, Room>(&insert_query)
            .bind(company_id)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(secret_key)
            .fetch_one(&mut *tx)
            .await?;

        let fields = FormFieldRepo::insert_all(&mut *tx, room.id, &input.fields).await?;

        tx.commit().await?;
        Ok(RoomWithFields { room, fields })
    }

    /// Find a room by internal ID, active or not.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Room>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rooms WHERE id = $1");
        sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a room by ID, enriched with its fields.
    pub async fn find_with_fields(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<RoomWithFields>, sqlx::Error> {
        match Self::find_by_id(pool, id).await? {
            Some(room) => {
                let fields = FormFieldRepo::list_for_room(pool, room.id).await?;
                Ok(Some(RoomWithFields { room, fields }))
            }
            None => Ok(None),
        }
    }

    /// Find an active room by its secret join key.
    ///
    /// Inactive rooms are indistinguishable from missing ones.
    pub async fn find_active_by_secret_key(
        pool: &PgPool,
        secret_key: &str,
    ) -> Result<Option<Room>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rooms WHERE secret_key = $1 AND is_active = true"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(secret_key)
            .fetch_optional(pool)
            .await
    }

    /// Lock an active room against concurrent edits for the rest of the
    /// transaction (`FOR SHARE`).
    ///
    /// Returns `None` if the room is gone or was deactivated.
    pub async fn lock_active_for_issuance(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Room>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rooms WHERE id = $1 AND is_active = true FOR SHARE"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List a company's rooms, newest first.
    pub async fn list_by_company(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<Room>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rooms WHERE company_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// Update a room. Only non-`None` fields are applied.
    ///
    /// If `fields` is `Some`, replaces the whole field set in the same
    /// transaction. Returns `None` if no row with the given `id` exists.
    pub async fn update_with_fields(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRoom,
    ) -> Result<Option<RoomWithFields>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let update_query = format!(
            "UPDATE rooms SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                is_active = COALESCE($4, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let room = sqlx::query_as::<_, Room>(&update_query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.is_active)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(room) = room else {
            tx.rollback().await?;
            return Ok(None);
        };

        if let Some(ref fields) = input.fields {
            FormFieldRepo::replace_for_room(&mut *tx, room.id, fields).await?;
        }

        tx.commit().await?;

        let fields = FormFieldRepo::list_for_room(pool, room.id).await?;
        Ok(Some(RoomWithFields { room, fields }))
    }

    /// Delete a room with its fields, sessions, and tickets.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
