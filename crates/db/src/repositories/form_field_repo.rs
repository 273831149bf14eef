//! Repository for the `form_fields` table.

use antrean_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::form_field::{CreateFormField, FormField};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, room_id, label, field_type, required, display_order, created_at, updated_at";

/// Provides operations on a room's intake form definition.
pub struct FormFieldRepo;

impl FormFieldRepo {
    /// List a room's fields in display order.
    ///
    /// Accepts a pool or an open transaction.
    pub async fn list_for_room<'e>(
        executor: impl PgExecutor<'e>,
        room_id: DbId,
    ) -> Result<Vec<FormField>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM form_fields
             WHERE room_id = $1
             ORDER BY display_order, id"
        );
        sqlx::query_as::<_, FormField>(&query)
            .bind(room_id)
            .fetch_all(executor)
            .await
    }

    /// Insert `fields` for a room, using each field's list position as its
    /// display order.
    pub async fn insert_all(
        conn: &mut PgConnection,
        room_id: DbId,
        fields: &[CreateFormField],
    ) -> Result<Vec<FormField>, sqlx::Error> {
        let query = format!(
            "INSERT INTO form_fields (room_id, label, field_type, required, display_order)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );

        let mut created = Vec::with_capacity(fields.len());
        for (position, field) in fields.iter().enumerate() {
            let row = sqlx::query_as::<_, FormField>(&query)
                .bind(room_id)
                .bind(field.label.trim())
                .bind(field.field_type.as_str())
                .bind(field.required)
                .bind(position as i32)
                .fetch_one(&mut *conn)
                .await?;
            created.push(row);
        }
        Ok(created)
    }

    /// Replace a room's whole field set.
    ///
    /// Answers already recorded keep their copied label and order; their
    /// `field_id` is set to NULL by the foreign key.
    pub async fn replace_for_room(
        conn: &mut PgConnection,
        room_id: DbId,
        fields: &[CreateFormField],
    ) -> Result<Vec<FormField>, sqlx::Error> {
        sqlx::query("DELETE FROM form_fields WHERE room_id = $1")
            .bind(room_id)
            .execute(&mut *conn)
            .await?;
        Self::insert_all(conn, room_id, fields).await
    }
}
