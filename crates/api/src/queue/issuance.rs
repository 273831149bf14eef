//! Ticket issuance.

use antrean_core::access::{authorize, Capability};
use antrean_core::error::CoreError;
use antrean_core::intake::{validate_answers, AnswerInput, FieldRule};
use antrean_db::models::queue_ticket::{QueueTicket, TicketWithAnswers};
use antrean_db::repositories::{FormFieldRepo, QueueSessionRepo, QueueTicketRepo, RoomRepo};
use antrean_db::{is_unique_violation, DbPool};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

/// Constraint that admits one ticket per user per session.
const ONE_TICKET_PER_USER: &str = "uq_queue_tickets_session_user";

/// Result of a join request.
#[derive(Debug, Serialize)]
pub struct JoinOutcome {
    pub ticket: TicketWithAnswers,
    /// `true` when the caller already held a ticket in the session and that
    /// ticket is returned unchanged.
    pub already_joined: bool,
}

/// Join the room identified by `secret_key`, issuing the caller a ticket in
/// the room's active session.
///
/// Checks run in order: role, key present, room exists and is active,
/// session resolved, answers valid, caller not already holding a ticket. The
/// room row stays share-locked from validation to commit; the counter
/// increment, ticket insert, and answer inserts commit together.
pub async fn join_room(
    pool: &DbPool,
    caller: &AuthUser,
    secret_key: &str,
    answers: &[AnswerInput],
) -> AppResult<JoinOutcome> {
    authorize(&caller.role, Capability::JoinQueue)?;

    let secret_key = secret_key.trim();
    if secret_key.is_empty() {
        return Err(CoreError::Validation("secret_key is required".into()).into());
    }

    let room = RoomRepo::find_active_by_secret_key(pool, secret_key)
        .await?
        .ok_or(CoreError::NotFoundByKey { entity: "Room" })?;

    let session = QueueSessionRepo::get_or_create_active(pool, room.id)
        .await?
        .ok_or_else(|| {
            CoreError::Conflict("The room's queue session changed while joining; retry".into())
        })?;

    let mut tx = pool.begin().await?;

    // Held until commit so a concurrent form edit cannot remove a field
    // between validation and the answer inserts.
    RoomRepo::lock_active_for_issuance(&mut *tx, room.id)
        .await?
        .ok_or(CoreError::NotFoundByKey { entity: "Room" })?;

    let rules = FormFieldRepo::list_for_room(&mut *tx, room.id)
        .await?
        .iter()
        .map(|f| f.rule())
        .collect::<Result<Vec<FieldRule>, _>>()?;
    validate_answers(&rules, answers)?;

    if let Some(existing) =
        QueueTicketRepo::find_by_session_and_user(&mut *tx, session.id, caller.user_id).await?
    {
        tx.rollback().await?;
        return already_joined(pool, existing).await;
    }

    let number = QueueSessionRepo::issue_next_number(&mut *tx, session.id)
        .await?
        .ok_or_else(|| {
            CoreError::Conflict("The room's queue session closed while joining; retry".into())
        })?;

    let ticket = match QueueTicketRepo::insert(&mut *tx, session.id, caller.user_id, number).await
    {
        Ok(ticket) => ticket,
        Err(err) if is_unique_violation(&err, ONE_TICKET_PER_USER) => {
            // A concurrent join by the same caller won; drop our increment.
            tx.rollback().await?;
            tracing::debug!(
                session_id = session.id,
                user_id = caller.user_id,
                "Concurrent duplicate join resolved to existing ticket"
            );
            let existing =
                QueueTicketRepo::find_by_session_and_user(pool, session.id, caller.user_id)
                    .await?
                    .ok_or(AppError::Database(err))?;
            return already_joined(pool, existing).await;
        }
        Err(err) => return Err(err.into()),
    };

    let answers = QueueTicketRepo::insert_answers(&mut *tx, ticket.id, answers).await?;

    tx.commit().await?;

    tracing::info!(
        ticket_id = ticket.id,
        session_id = session.id,
        room_id = room.id,
        user_id = caller.user_id,
        number = ticket.number,
        "Issued queue ticket"
    );

    Ok(JoinOutcome {
        ticket: TicketWithAnswers { ticket, answers },
        already_joined: false,
    })
}

async fn already_joined(pool: &DbPool, ticket: QueueTicket) -> AppResult<JoinOutcome> {
    let answers = QueueTicketRepo::list_answers(pool, ticket.id).await?;
    Ok(JoinOutcome {
        ticket: TicketWithAnswers { ticket, answers },
        already_joined: true,
    })
}
