//! Queue ticket lifecycle and its transition policy.
//!
//! ```text
//! waiting -> serving, skipped, cancelled
//! serving -> done, skipped
//! done, skipped, cancelled: terminal
//! ```
//!
//! The policy is a pure lookup; the status service consults it before any
//! mutation and never coerces an illegal move into a legal one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Status of a queue ticket. Stored as lowercase text in `queue_tickets.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Waiting,
    Serving,
    Done,
    Skipped,
    Cancelled,
}

/// Every status, in lifecycle order.
pub const ALL_STATUSES: [TicketStatus; 5] = [
    TicketStatus::Waiting,
    TicketStatus::Serving,
    TicketStatus::Done,
    TicketStatus::Skipped,
    TicketStatus::Cancelled,
];

impl TicketStatus {
    /// The database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Waiting => "waiting",
            TicketStatus::Serving => "serving",
            TicketStatus::Done => "done",
            TicketStatus::Skipped => "skipped",
            TicketStatus::Cancelled => "cancelled",
        }
    }

    /// Statuses reachable in one step from `self`.
    pub fn valid_transitions(self) -> &'static [TicketStatus] {
        match self {
            TicketStatus::Waiting => &[
                TicketStatus::Serving,
                TicketStatus::Skipped,
                TicketStatus::Cancelled,
            ],
            TicketStatus::Serving => &[TicketStatus::Done, TicketStatus::Skipped],
            TicketStatus::Done | TicketStatus::Skipped | TicketStatus::Cancelled => &[],
        }
    }

    /// No further transitions are possible.
    pub fn is_terminal(self) -> bool {
        self.valid_transitions().is_empty()
    }

    /// Entering this status records `completed_at`.
    pub fn completes_ticket(self) -> bool {
        matches!(
            self,
            TicketStatus::Done | TicketStatus::Skipped | TicketStatus::Cancelled
        )
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = CoreError;

    /// Parse a status name. Unknown values are a validation error listing the
    /// accepted names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_STATUSES
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = ALL_STATUSES.iter().map(|st| st.as_str()).collect();
                CoreError::Validation(format!(
                    "Invalid ticket status '{s}'. Must be one of: {names:?}"
                ))
            })
    }
}

/// Check whether a ticket may move from `current` to `next`.
pub fn is_valid_transition(current: TicketStatus, next: TicketStatus) -> bool {
    current.valid_transitions().contains(&next)
}

/// Validate a transition, naming both states when it is rejected.
pub fn validate_transition(current: TicketStatus, next: TicketStatus) -> Result<(), CoreError> {
    if is_valid_transition(current, next) {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition {
            from: current.as_str(),
            to: next.as_str(),
        })
    }
}
