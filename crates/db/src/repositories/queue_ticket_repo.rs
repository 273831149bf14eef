//! Repository for the `queue_tickets` and `ticket_form_answers` tables.

use antrean_core::intake::AnswerInput;
use antrean_core::ticket_status::TicketStatus;
use antrean_core::types::{DbId, QueueNumber};
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::queue_ticket::{
    MyTicketView, QueueTicket, TicketContext, TicketFormAnswer, TicketWithAnswers,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, session_id, user_id, number, status, called_at, completed_at, \
                        created_at, updated_at";

/// Ticket columns qualified for JOIN queries.
const T_COLUMNS: &str = "t.id, t.session_id, t.user_id, t.number, t.status, t.called_at, \
                          t.completed_at, t.created_at, t.updated_at";

const ANSWER_COLUMNS: &str =
    "id, ticket_id, field_id, label, display_order, value, created_at";

/// Provides ticket issuance steps, status updates, and board queries.
pub struct QueueTicketRepo;

impl QueueTicketRepo {
    /// Insert a `waiting` ticket with an already-issued number.
    ///
    /// A second ticket for the same user in the same session fails with a
    /// unique violation on `uq_queue_tickets_session_user`.
    pub async fn insert(
        conn: &mut PgConnection,
        session_id: DbId,
        user_id: DbId,
        number: QueueNumber,
    ) -> Result<QueueTicket, sqlx::Error> {
        let query = format!(
            "INSERT INTO queue_tickets (session_id, user_id, number)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QueueTicket>(&query)
            .bind(session_id)
            .bind(user_id)
            .bind(number)
            .fetch_one(conn)
            .await
    }

    /// Record the intake answers submitted with a ticket, copying each
    /// field's current label and display order.
    ///
    /// Returns answers in display order. Fails with `RowNotFound` if a field
    /// no longer exists; callers hold the room lock so this cannot race a
    /// form edit.
    pub async fn insert_answers(
        conn: &mut PgConnection,
        ticket_id: DbId,
        answers: &[AnswerInput],
    ) -> Result<Vec<TicketFormAnswer>, sqlx::Error> {
        let query = format!(
            "INSERT INTO ticket_form_answers (ticket_id, field_id, label, display_order, value)
             SELECT $1, f.id, f.label, f.display_order, $3
             FROM form_fields f
             WHERE f.id = $2
             RETURNING {ANSWER_COLUMNS}"
        );

        let mut created = Vec::with_capacity(answers.len());
        for answer in answers {
            let row = sqlx::query_as::<_, TicketFormAnswer>(&query)
                .bind(ticket_id)
                .bind(answer.field_id)
                .bind(&answer.value)
                .fetch_one(&mut *conn)
                .await?;
            created.push(row);
        }
        created.sort_by_key(|a| (a.display_order, a.id));
        Ok(created)
    }

    /// Find a ticket by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<QueueTicket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM queue_tickets WHERE id = $1");
        sqlx::query_as::<_, QueueTicket>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the ticket a user already holds in a session.
    pub async fn find_by_session_and_user<'e>(
        executor: impl PgExecutor<'e>,
        session_id: DbId,
        user_id: DbId,
    ) -> Result<Option<QueueTicket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM queue_tickets WHERE session_id = $1 AND user_id = $2"
        );
        sqlx::query_as::<_, QueueTicket>(&query)
            .bind(session_id)
            .bind(user_id)
            .fetch_optional(executor)
            .await
    }

    /// Load a ticket with the room and company it belongs to.
    pub async fn find_context(
        pool: &PgPool,
        ticket_id: DbId,
    ) -> Result<Option<TicketContext>, sqlx::Error> {
        let query = format!(
            "SELECT {T_COLUMNS}, s.room_id, r.company_id
             FROM queue_tickets t
             JOIN queue_sessions s ON s.id = t.session_id
             JOIN rooms r ON r.id = s.room_id
             WHERE t.id = $1"
        );
        sqlx::query_as::<_, TicketContext>(&query)
            .bind(ticket_id)
            .fetch_optional(pool)
            .await
    }

    /// Re-read a ticket under a row lock so a transition is checked against
    /// its committed status.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        ticket_id: DbId,
    ) -> Result<Option<QueueTicket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM queue_tickets WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, QueueTicket>(&query)
            .bind(ticket_id)
            .fetch_optional(conn)
            .await
    }

    /// Write a new status, stamping `called_at` on entering `serving` and
    /// `completed_at` on entering a terminal state.
    pub async fn update_status(
        conn: &mut PgConnection,
        ticket_id: DbId,
        next: TicketStatus,
    ) -> Result<QueueTicket, sqlx::Error> {
        let query = format!(
            "UPDATE queue_tickets SET
                status = $2,
                called_at = CASE WHEN $3 THEN NOW() ELSE called_at END,
                completed_at = CASE WHEN $4 THEN NOW() ELSE completed_at END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QueueTicket>(&query)
            .bind(ticket_id)
            .bind(next.as_str())
            .bind(next == TicketStatus::Serving)
            .bind(next.completes_ticket())
            .fetch_one(conn)
            .await
    }

    /// List the answers recorded for a ticket, in field display order.
    pub async fn list_answers(
        pool: &PgPool,
        ticket_id: DbId,
    ) -> Result<Vec<TicketFormAnswer>, sqlx::Error> {
        let query = format!(
            "SELECT {ANSWER_COLUMNS} FROM ticket_form_answers
             WHERE ticket_id = $1
             ORDER BY display_order, id"
        );
        sqlx::query_as::<_, TicketFormAnswer>(&query)
            .bind(ticket_id)
            .fetch_all(pool)
            .await
    }

    /// List every ticket in a session ordered by number, with answers.
    pub async fn list_for_session_with_answers(
        pool: &PgPool,
        session_id: DbId,
    ) -> Result<Vec<TicketWithAnswers>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM queue_tickets WHERE session_id = $1 ORDER BY number"
        );
        let tickets = sqlx::query_as::<_, QueueTicket>(&query)
            .bind(session_id)
            .fetch_all(pool)
            .await?;

        let mut result = Vec::with_capacity(tickets.len());
        for ticket in tickets {
            let answers = Self::list_answers(pool, ticket.id).await?;
            result.push(TicketWithAnswers { ticket, answers });
        }
        Ok(result)
    }

    /// List a user's tickets in active sessions, newest first, with each
    /// session's "now serving" number and the count of tickets ahead.
    pub async fn list_mine(pool: &PgPool, user_id: DbId) -> Result<Vec<MyTicketView>, sqlx::Error> {
        sqlx::query_as::<_, MyTicketView>(
            "SELECT t.id AS ticket_id, t.session_id, s.room_id, r.name AS room_name,
                    t.number, t.status, s.called_number,
                    (SELECT COUNT(*) FROM queue_tickets ahead
                      WHERE ahead.session_id = t.session_id
                        AND ahead.status = 'waiting'
                        AND ahead.number < t.number) AS waiting_ahead,
                    t.created_at
             FROM queue_tickets t
             JOIN queue_sessions s ON s.id = t.session_id
             JOIN rooms r ON r.id = s.room_id
             WHERE t.user_id = $1 AND s.status = 'active'
             ORDER BY t.created_at DESC, t.id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
