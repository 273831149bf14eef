//! Capability-based authorization guard.
//!
//! Every queue operation names the [`Capability`] it needs. A caller's role
//! grants a fixed set of capabilities; [`authorize`] is evaluated before any
//! mutation, and [`ensure_company_owns`] checks the ownership chain
//! (caller -> company -> room) for operator actions.

use crate::error::CoreError;
use crate::roles::{ROLE_COMPANY, ROLE_USER};
use crate::types::DbId;

/// An action a caller may be allowed to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Take a ticket in a room's active session.
    JoinQueue,
    /// List the caller's own tickets.
    ViewOwnTickets,
    /// Create, edit and delete rooms and their form fields.
    ManageRooms,
    /// Move tickets through their lifecycle and read the ticket board.
    OperateQueue,
}

impl Capability {
    /// The single role that holds this capability.
    pub fn required_role(self) -> &'static str {
        match self {
            Capability::JoinQueue | Capability::ViewOwnTickets => ROLE_USER,
            Capability::ManageRooms | Capability::OperateQueue => ROLE_COMPANY,
        }
    }

    fn denial_message(self) -> &'static str {
        match self {
            Capability::JoinQueue => "Companies cannot join a queue",
            Capability::ViewOwnTickets => "Only users hold queue tickets",
            Capability::ManageRooms => "Company role required to manage rooms",
            Capability::OperateQueue => "Company role required to operate a queue",
        }
    }
}

/// Check that `role` grants `capability`. Rejects with 403 Forbidden.
pub fn authorize(role: &str, capability: Capability) -> Result<(), CoreError> {
    if role == capability.required_role() {
        Ok(())
    } else {
        Err(CoreError::Forbidden(capability.denial_message().into()))
    }
}

/// Check that the caller's company (if any) owns the resource.
///
/// A company-role caller without a company row owns nothing. Mismatches are
/// reported as Forbidden, never as NotFound.
pub fn ensure_company_owns(
    caller_company_id: Option<DbId>,
    owner_company_id: DbId,
    entity: &'static str,
) -> Result<(), CoreError> {
    match caller_company_id {
        Some(id) if id == owner_company_id => Ok(()),
        Some(_) => Err(CoreError::Forbidden(format!(
            "{entity} belongs to another company"
        ))),
        None => Err(CoreError::Forbidden(
            "No company profile is linked to this account".into(),
        )),
    }
}
