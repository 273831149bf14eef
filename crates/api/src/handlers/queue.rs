//! Handlers for the two core queue endpoints: joining a room and moving a
//! ticket through its lifecycle.

use antrean_core::intake::AnswerInput;
use antrean_core::types::DbId;
use antrean_db::models::queue_ticket::QueueTicket;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::queue::{join_room, update_ticket_status};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /rooms/join`.
#[derive(Debug, Deserialize)]
pub struct JoinRoomRequest {
    #[serde(default)]
    pub secret_key: String,
    #[serde(default)]
    pub answers: Vec<AnswerInput>,
}

/// Request body for `PATCH /transactions/ticket/{ticket_id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: String,
}

/// POST /api/v1/rooms/join
///
/// 201 with a new ticket, or 200 with the caller's existing ticket and
/// `already_joined: true`.
pub async fn join(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<JoinRoomRequest>,
) -> AppResult<impl IntoResponse> {
    let outcome = join_room(&state.pool, &user, &input.secret_key, &input.answers).await?;

    let status = if outcome.already_joined {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(DataResponse { data: outcome })))
}

/// PATCH /api/v1/transactions/ticket/{ticket_id}/status
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(ticket_id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<DataResponse<QueueTicket>>> {
    let ticket = update_ticket_status(&state.pool, &user, ticket_id, &input.status).await?;
    Ok(Json(DataResponse { data: ticket }))
}
