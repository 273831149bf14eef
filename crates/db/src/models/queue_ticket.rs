//! Queue ticket, form answer, and board view models.

use antrean_core::error::CoreError;
use antrean_core::ticket_status::TicketStatus;
use antrean_core::types::{DbId, QueueNumber, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::queue_session::QueueSession;

/// A row from the `queue_tickets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QueueTicket {
    pub id: DbId,
    pub session_id: DbId,
    pub user_id: DbId,
    pub number: QueueNumber,
    pub status: String,
    pub called_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl QueueTicket {
    /// Parse the stored status.
    ///
    /// The column is constrained by a `CHECK`, so a failure here means the
    /// schema and [`TicketStatus`] have drifted apart.
    pub fn parsed_status(&self) -> Result<TicketStatus, CoreError> {
        self.status.parse().map_err(|_| {
            CoreError::Internal(format!(
                "Ticket {} has unrecognised status '{}'",
                self.id, self.status
            ))
        })
    }
}

/// A row from the `ticket_form_answers` table.
///
/// `label` and `display_order` are copied from the field at issue time, so
/// the answer survives later edits to the room's form.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketFormAnswer {
    pub id: DbId,
    pub ticket_id: DbId,
    /// `None` once the field has been removed from the room.
    pub field_id: Option<DbId>,
    pub label: String,
    pub display_order: i32,
    pub value: String,
    pub created_at: Timestamp,
}

/// A ticket with the intake answers captured when it was issued.
#[derive(Debug, Clone, Serialize)]
pub struct TicketWithAnswers {
    #[serde(flatten)]
    pub ticket: QueueTicket,
    pub answers: Vec<TicketFormAnswer>,
}

/// A ticket joined with the ownership chain needed for authorization.
#[derive(Debug, Clone, FromRow)]
pub struct TicketContext {
    #[sqlx(flatten)]
    pub ticket: QueueTicket,
    pub room_id: DbId,
    pub company_id: DbId,
}

/// A user's view of one of their tickets in an active session.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MyTicketView {
    pub ticket_id: DbId,
    pub session_id: DbId,
    pub room_id: DbId,
    pub room_name: String,
    pub number: QueueNumber,
    pub status: String,
    pub called_number: QueueNumber,
    /// Tickets in the same session still `waiting` with a lower number.
    pub waiting_ahead: i64,
    pub created_at: Timestamp,
}

/// The operator's pull-based board for one room.
#[derive(Debug, Clone, Serialize)]
pub struct QueueBoard {
    pub session: Option<QueueSession>,
    pub tickets: Vec<TicketWithAnswers>,
}
