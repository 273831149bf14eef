//! Queue session model.

use antrean_core::session_status::SESSION_ACTIVE;
use antrean_core::types::{DbId, QueueNumber, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `queue_sessions` table.
///
/// `current_number` is the last issued ticket number; `called_number` is the
/// number of the ticket most recently moved to `serving`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QueueSession {
    pub id: DbId,
    pub room_id: DbId,
    pub status: String,
    pub current_number: QueueNumber,
    pub called_number: QueueNumber,
    pub opened_at: Timestamp,
    pub closed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl QueueSession {
    pub fn is_active(&self) -> bool {
        self.status == SESSION_ACTIVE
    }
}
