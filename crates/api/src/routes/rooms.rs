//! Route definitions for the `/rooms` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{queue, rooms};
use crate::state::AppState;

/// Routes mounted at `/rooms`.
///
/// ```text
/// GET, POST          /                     -> list, create
/// POST               /join                 -> queue::join
/// GET                /join/{secret_key}    -> preview
/// GET, PUT, DELETE   /{id}                 -> get_by_id, update, delete
/// GET                /{id}/queue           -> board
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(rooms::list).post(rooms::create))
        .route("/join", post(queue::join))
        .route("/join/{secret_key}", get(rooms::preview))
        .route(
            "/{id}",
            get(rooms::get_by_id)
                .put(rooms::update)
                .delete(rooms::delete),
        )
        .route("/{id}/queue", get(rooms::board))
}
