//! Route definitions for the `/tickets` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::tickets;
use crate::state::AppState;

/// Routes mounted at `/tickets`.
///
/// ```text
/// GET /mine -> mine
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/mine", get(tickets::mine))
}
