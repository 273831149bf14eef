//! Handlers for the `/tickets` resource.

use antrean_db::models::queue_ticket::MyTicketView;
use antrean_db::repositories::QueueTicketRepo;
use axum::extract::State;
use axum::Json;

use crate::error::AppResult;
use crate::middleware::rbac::RequireUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/tickets/mine
///
/// The caller's tickets in active sessions with the "now serving" number and
/// how many waiting tickets are ahead of each.
pub async fn mine(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> AppResult<Json<DataResponse<Vec<MyTicketView>>>> {
    let tickets = QueueTicketRepo::list_mine(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: tickets }))
}
