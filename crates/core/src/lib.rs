//! Domain types and rules for the Antrean queue service.
//!
//! Everything in this crate is pure: no database, no HTTP. The repository
//! and API layers depend on it for ids, errors, authorization rules, the
//! ticket status policy, and intake-form validation.

pub mod access;
pub mod error;
pub mod intake;
pub mod registration;
pub mod roles;
pub mod room;
pub mod session_status;
pub mod ticket_status;
pub mod types;
