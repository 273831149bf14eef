//! Ticket status transitions.

use antrean_core::access::{authorize, ensure_company_owns, Capability};
use antrean_core::error::CoreError;
use antrean_core::ticket_status::{validate_transition, TicketStatus};
use antrean_core::types::DbId;
use antrean_db::models::queue_ticket::QueueTicket;
use antrean_db::repositories::{CompanyRepo, QueueSessionRepo, QueueTicketRepo};
use antrean_db::DbPool;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;

/// Move a ticket to `next_status` on behalf of the company that owns its room.
///
/// Checks run in order: role, ticket exists, caller's company owns the room,
/// status is known, transition is allowed. The transition is re-checked
/// against the ticket row locked inside the transaction, so two operators
/// acting at once cannot both move the ticket out of the same state.
///
/// Entering `serving` also points the session's `called_number` at this
/// ticket.
pub async fn update_ticket_status(
    pool: &DbPool,
    caller: &AuthUser,
    ticket_id: DbId,
    next_status: &str,
) -> AppResult<QueueTicket> {
    authorize(&caller.role, Capability::OperateQueue)?;

    let context = QueueTicketRepo::find_context(pool, ticket_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Ticket",
            id: ticket_id,
        })?;

    let company = CompanyRepo::find_by_user_id(pool, caller.user_id).await?;
    ensure_company_owns(company.map(|c| c.id), context.company_id, "Ticket")?;

    let next: TicketStatus = next_status.trim().parse()?;

    let mut tx = pool.begin().await?;

    let current_row = QueueTicketRepo::lock_for_update(&mut *tx, ticket_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Ticket",
            id: ticket_id,
        })?;
    let current = current_row.parsed_status()?;
    validate_transition(current, next)?;

    let updated = QueueTicketRepo::update_status(&mut *tx, ticket_id, next).await?;

    if next == TicketStatus::Serving {
        QueueSessionRepo::set_called_number(&mut *tx, current_row.session_id, current_row.number)
            .await?;
    }

    tx.commit().await?;

    tracing::info!(
        ticket_id,
        session_id = updated.session_id,
        room_id = context.room_id,
        number = updated.number,
        from = current.as_str(),
        to = next.as_str(),
        "Ticket status changed"
    );

    Ok(updated)
}
