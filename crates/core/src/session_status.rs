//! Queue session status constants.
//!
//! These must match the `CHECK` constraint and the partial unique index
//! `uq_queue_sessions_active_room` in `20260301000004_create_queue_sessions.sql`.

/// The session currently accepting joins. At most one per room.
pub const SESSION_ACTIVE: &str = "active";
/// A finished session, kept for history.
pub const SESSION_CLOSED: &str = "closed";
