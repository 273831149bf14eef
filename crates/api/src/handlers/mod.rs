//! Request handlers.
//!
//! Handlers parse the request, delegate to a repository or a [`crate::queue`]
//! service, and wrap results in [`crate::response::DataResponse`]. Errors map
//! to HTTP via [`crate::error::AppError`].

pub mod auth;
pub mod queue;
pub mod rooms;
pub mod tickets;
