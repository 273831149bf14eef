//! Route definitions for the `/transactions` resource (operator actions on tickets).

use axum::routing::patch;
use axum::Router;

use crate::handlers::queue;
use crate::state::AppState;

/// Routes mounted at `/transactions`.
///
/// ```text
/// PATCH /ticket/{ticket_id}/status -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/ticket/{ticket_id}/status", patch(queue::update_status))
}
