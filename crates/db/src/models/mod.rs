//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - `Deserialize` DTOs for inserts and patches where the API accepts them

pub mod auth_session;
pub mod email_verification;
pub mod form_field;
pub mod queue_session;
pub mod queue_ticket;
pub mod room;
pub mod user;
