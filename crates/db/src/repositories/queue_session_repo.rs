//! Repository for the `queue_sessions` table: the per-room ticket counter.

use antrean_core::types::{DbId, QueueNumber};
use sqlx::{PgConnection, PgPool};

use crate::models::queue_session::QueueSession;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, room_id, status, current_number, called_number, opened_at, \
                        closed_at, created_at, updated_at";

/// How many times [`QueueSessionRepo::get_or_create_active`] retries when the
/// session it lost a creation race to disappears before it can be read.
const MAX_ACTIVATION_ATTEMPTS: u32 = 3;

/// Allocates sessions and ticket numbers.
pub struct QueueSessionRepo;

impl QueueSessionRepo {
    /// Find a session by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<QueueSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM queue_sessions WHERE id = $1");
        sqlx::query_as::<_, QueueSession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the room's active session, if any.
    pub async fn find_active_for_room(
        pool: &PgPool,
        room_id: DbId,
    ) -> Result<Option<QueueSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM queue_sessions WHERE room_id = $1 AND status = 'active'"
        );
        sqlx::query_as::<_, QueueSession>(&query)
            .bind(room_id)
            .fetch_optional(pool)
            .await
    }

    /// Return the room's active session, creating one with zeroed counters
    /// when none exists.
    ///
    /// Uniqueness is enforced by the partial index
    /// `uq_queue_sessions_active_room`. A creator that loses the race gets no
    /// row back from the insert and re-reads the winner's session. Returns
    /// `None` only if the winner's session keeps vanishing (closed between
    /// insert and re-read) for every attempt.
    pub async fn get_or_create_active(
        pool: &PgPool,
        room_id: DbId,
    ) -> Result<Option<QueueSession>, sqlx::Error> {
        let insert_query = format!(
            "INSERT INTO queue_sessions (room_id)
             VALUES ($1)
             ON CONFLICT (room_id) WHERE status = 'active' DO NOTHING
             RETURNING {COLUMNS}"
        );

        for attempt in 1..=MAX_ACTIVATION_ATTEMPTS {
            if let Some(existing) = Self::find_active_for_room(pool, room_id).await? {
                return Ok(Some(existing));
            }

            let created = sqlx::query_as::<_, QueueSession>(&insert_query)
                .bind(room_id)
                .fetch_optional(pool)
                .await?;
            if let Some(session) = created {
                tracing::info!(room_id, session_id = session.id, "Opened queue session");
                return Ok(Some(session));
            }

            tracing::debug!(room_id, attempt, "Lost session creation race, re-reading");
        }

        tracing::warn!(room_id, "No stable active session after retries");
        Ok(None)
    }

    /// Advance the session's counter by one and return the new value.
    ///
    /// Runs inside the issuing transaction: the row lock taken by the
    /// `UPDATE` serializes concurrent issuers, and a rollback undoes the
    /// increment. Returns `None` if the session is no longer active.
    pub async fn issue_next_number(
        conn: &mut PgConnection,
        session_id: DbId,
    ) -> Result<Option<QueueNumber>, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE queue_sessions SET current_number = current_number + 1
             WHERE id = $1 AND status = 'active'
             RETURNING current_number",
        )
        .bind(session_id)
        .fetch_optional(conn)
        .await
    }

    /// Point the session's "now serving" marker at `number`.
    pub async fn set_called_number(
        conn: &mut PgConnection,
        session_id: DbId,
        number: QueueNumber,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE queue_sessions SET called_number = $2 WHERE id = $1")
            .bind(session_id)
            .bind(number)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Close the room's active session, if any. Returns `true` if one was closed.
    pub async fn close_active_for_room(pool: &PgPool, room_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE queue_sessions SET status = 'closed', closed_at = NOW()
             WHERE room_id = $1 AND status = 'active'",
        )
        .bind(room_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
