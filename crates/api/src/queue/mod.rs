//! Queue services: ticket issuance and ticket status transitions.
//!
//! These run the multi-step, transactional flows behind the two core queue
//! endpoints. Handlers stay thin and delegate here; authorization is
//! re-checked inside each service before anything is read or written.
//!
//! - [`issuance::join_room`] -- take a numbered ticket in a room's active session.
//! - [`status::update_ticket_status`] -- move a ticket through its lifecycle.

pub mod issuance;
pub mod status;

pub use issuance::{join_room, JoinOutcome};
pub use status::update_ticket_status;
