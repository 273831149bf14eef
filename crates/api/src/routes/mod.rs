pub mod auth;
pub mod health;
pub mod rooms;
pub mod tickets;
pub mod transactions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/verify-email?token=                        confirm email (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public, token in body or cookie)
/// /auth/logout                                     logout (public, token in body or cookie)
/// /auth/me                                         current user (auth)
///
/// /rooms                                           list, create (company)
/// /rooms/join                                      join a queue (user)
/// /rooms/join/{secret_key}                         preview by key (auth)
/// /rooms/{id}                                      get, update, delete (owning company)
/// /rooms/{id}/queue                                ticket board (owning company)
///
/// /tickets/mine                                    caller's tickets (user)
///
/// /transactions/ticket/{ticket_id}/status          change ticket status (owning company)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Registration, verification, and token lifecycle.
        .nest("/auth", auth::router())
        // Room CRUD, join, and the operator board.
        .nest("/rooms", rooms::router())
        // Joiner-facing ticket views.
        .nest("/tickets", tickets::router())
        // Operator ticket transitions.
        .nest("/transactions", transactions::router())
}
